//! Fetch dependencies as git submodules, recursing into those which declare their own.

use std::path::{Path, PathBuf};

use crate::dependency::{DependencyName, Remote};
use crate::error::{FetchError, Stage};
use crate::git::{checkout_task, submodule_add_task};
use crate::manifest::{Manifest, NESTED_MANIFEST};
use crate::process::{Execute, System, nested_fetch_task, resolve_program};

/// The branch dependencies are switched to when none is given.
pub const DEFAULT_BRANCH: &str = "master";

/// The executable used to run nested fetch scripts when none is given.
pub const DEFAULT_EXECUTABLE: &str = "python";

/// A dependency with this directory declares dependencies of its own.
pub const SCRIPTS_DIR: &str = "scripts";

/// The script (under [`SCRIPTS_DIR`]) run to fetch a dependency's own dependencies when it has no
/// [`NESTED_MANIFEST`].
pub const NESTED_SCRIPT: &str = "fetch_dependencies.py";

/// Everything a fetch needs besides the dependencies themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchContext {
    /// The repository dependencies are added to.
    pub folder: PathBuf,
    /// The branch every added dependency is switched to.
    pub branch: String,
    /// Runs nested fetch scripts.
    pub executable: PathBuf,
    pub remote: Remote,
    depth: usize,
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FetchContext {
    pub fn new<P: Into<PathBuf>>(folder: P) -> Self {
        Self {
            folder: folder.into(),
            branch: DEFAULT_BRANCH.to_string(),
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            remote: Remote::default(),
            depth: 0,
        }
    }

    pub fn with_branch<S: Into<String>>(mut self, branch: S) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_executable<P: Into<PathBuf>>(mut self, executable: P) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_remote(mut self, remote: Remote) -> Self {
        self.remote = remote;
        self
    }

    /// How many nested manifests were followed to reach this context.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn nested(&self, folder: PathBuf, remote: Option<Remote>) -> Self {
        Self {
            folder,
            branch: self.branch.clone(),
            executable: self.executable.clone(),
            remote: remote.unwrap_or_else(|| self.remote.clone()),
            depth: self.depth + 1,
        }
    }

    /// Where each dependency would be fetched from and to, without fetching anything.
    pub fn plan(&self, dependencies: &[DependencyName]) -> Vec<PlannedDependency> {
        dependencies
            .iter()
            .map(|name| {
                let path = self.folder.join(name);
                PlannedDependency {
                    url: self.remote.url_for(name),
                    present: path.exists(),
                    name: name.clone(),
                    path,
                }
            })
            .collect()
    }
}

/// A dependency as it would be fetched in a given [`FetchContext`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PlannedDependency {
    pub name: DependencyName,
    pub url: String,
    pub path: PathBuf,
    /// Whether the dependency would be skipped as already satisfied.
    pub present: bool,
}

/// Progress reported while fetching.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    pub dependency: &'a DependencyName,
    /// Where the dependency is (or will be) checked out.
    pub path: &'a Path,
    /// 1-based position of the dependency within its set.
    pub position: usize,
    /// Size of the set the dependency belongs to.
    pub count: usize,
    /// How many nested manifests were followed to reach this dependency.
    pub depth: usize,
    pub kind: EventKind<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind<'a> {
    /// The dependency's directory already exists, so it was skipped.
    Satisfied,
    /// About to add the dependency as a submodule.
    Adding { url: &'a str },
    /// About to check out the requested branch.
    Checkout { branch: &'a str },
    /// The dependency has no dependencies of its own.
    Leaf,
    /// About to fetch the dependencies listed in a nested manifest.
    NestedManifest { count: usize },
    /// About to hand over to the dependency's own fetch script.
    NestedScript { script: &'a Path },
    /// The dependency (and anything nested beneath it) was fetched.
    Fetched,
    Failed { stage: Stage },
}

impl Event<'_> {
    /// Whether this event is worth showing even when progress is otherwise hidden.
    pub fn is_informational(&self) -> bool {
        matches!(self.kind, EventKind::Satisfied | EventKind::Leaf)
    }
}

impl std::fmt::Display for Event<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.dependency;
        match self.kind {
            EventKind::Satisfied => write!(f, "{name} dependency already satisfied. Skipping..."),
            EventKind::Adding { url } => write!(f, "Adding {name} from {url}"),
            EventKind::Checkout { branch } => write!(f, "Switching {name} to branch '{branch}'"),
            EventKind::Leaf => write!(f, "No further dependencies for {name}"),
            EventKind::NestedManifest { count } => {
                write!(f, "Fetching {count} nested dependencies of {name}")
            }
            EventKind::NestedScript { script } => {
                write!(f, "Running {} for {name}", script.display())
            }
            EventKind::Fetched => write!(f, "Fetched {name} into {}", self.path.display()),
            EventKind::Failed { stage } => write!(f, "Failed to {stage} '{name}'"),
        }
    }
}

/// Fetches dependencies with an executor for the commands it prepares, reporting progress to a
/// callback.
pub struct Fetcher<E, R> {
    executor: E,
    report: R,
}

impl<E, R> Fetcher<E, R>
where
    E: Execute,
    R: FnMut(&Event<'_>),
{
    pub fn new(executor: E, report: R) -> Self {
        Self { executor, report }
    }

    /// Fetch each dependency in order, stopping at the first failure. Nothing already fetched is
    /// rolled back.
    pub fn fetch(
        &mut self,
        dependencies: &[DependencyName],
        context: &FetchContext,
    ) -> Result<(), FetchError> {
        let count = dependencies.len();
        for (k, dependency) in dependencies.iter().enumerate() {
            let path = context.folder.join(dependency);
            let mut step = Step {
                fetcher: &mut *self,
                event: Event {
                    dependency,
                    path: &path,
                    position: k + 1,
                    count,
                    depth: context.depth,
                    kind: EventKind::Fetched,
                },
            };
            step.run(context)?;
        }
        Ok(())
    }

    /// Consume the fetcher, returning its executor.
    pub fn into_executor(self) -> E {
        self.executor
    }
}

// Fetches a single dependency
struct Step<'f, 'a, E, R> {
    fetcher: &'f mut Fetcher<E, R>,
    event: Event<'a>,
}

impl<E, R> Step<'_, '_, E, R>
where
    E: Execute,
    R: FnMut(&Event<'_>),
{
    fn emit(&mut self, kind: EventKind<'_>) {
        let event = Event { kind, ..self.event };
        (self.fetcher.report)(&event);
    }

    fn fail<T: Into<crate::Error>>(&mut self, stage: Stage, err: T) -> FetchError {
        self.emit(EventKind::Failed { stage });
        FetchError::new(self.event.dependency.as_str(), stage, err)
    }

    fn execute(&mut self, stage: Stage, mut task: std::process::Command) -> Result<(), FetchError> {
        match self.fetcher.executor.execute(&mut task) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(stage, err)),
        }
    }

    fn run(&mut self, context: &FetchContext) -> Result<(), FetchError> {
        let dependency = self.event.dependency;
        let path = self.event.path;
        if path.exists() {
            self.emit(EventKind::Satisfied);
            return Ok(());
        }

        let url = context.remote.url_for(dependency);
        self.emit(EventKind::Adding { url: &url });
        self.execute(
            Stage::Acquire,
            submodule_add_task(&context.folder, &url, dependency),
        )?;

        self.emit(EventKind::Checkout {
            branch: &context.branch,
        });
        self.execute(Stage::SwitchBranch, checkout_task(path, &context.branch))?;

        let scripts = path.join(SCRIPTS_DIR);
        if !scripts.is_dir() {
            self.emit(EventKind::Leaf);
        } else if scripts.join(NESTED_MANIFEST).is_file() {
            let manifest = match Manifest::read(scripts.join(NESTED_MANIFEST)) {
                Ok(manifest) => manifest,
                Err(err) => return Err(self.fail(Stage::Nested, err)),
            };
            self.emit(EventKind::NestedManifest {
                count: manifest.dependencies.len(),
            });
            let nested = context.nested(path.to_path_buf(), manifest.remote);
            self.fetcher.fetch(&manifest.dependencies, &nested)?;
        } else {
            self.emit(EventKind::NestedScript {
                script: &scripts.join(NESTED_SCRIPT),
            });
            // The script runs from within the dependency, so neither it nor the executable may be
            // relative to this process's working directory
            let executable = match resolve_program(&context.executable) {
                Ok(executable) => executable,
                Err(err) => return Err(self.fail(Stage::Nested, err)),
            };
            let script = Path::new(SCRIPTS_DIR).join(NESTED_SCRIPT);
            self.execute(
                Stage::Nested,
                nested_fetch_task(&executable, &script, &context.branch, path),
            )?;
        }

        self.emit(EventKind::Fetched);
        Ok(())
    }
}

/// Fetch `dependencies` into `folder` by running `git` directly, printing the same messages as a
/// nested fetch script would: which dependencies were skipped and which have no further
/// dependencies.
pub fn fetch<X, P>(
    dependencies: &[DependencyName],
    executable: X,
    branch: &str,
    folder: P,
) -> Result<(), FetchError>
where
    X: Into<PathBuf>,
    P: Into<PathBuf>,
{
    let context = FetchContext::new(folder)
        .with_executable(executable)
        .with_branch(branch);
    let report = |event: &Event<'_>| {
        if event.is_informational() {
            println!("{event}");
        }
    };
    Fetcher::new(System, report).fetch(dependencies, &context)
}
