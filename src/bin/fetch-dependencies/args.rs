use std::path::PathBuf;

use clap::Parser;

use fetch_dependencies::fetch::{DEFAULT_BRANCH, DEFAULT_EXECUTABLE};
use fetch_dependencies::{DependencySet, FetchContext, Manifest, default_dependencies};

use crate::error::AppError;

// Shamelessly borrowed from https://github.com/crate-ci/clap-cargo/blob/0378657ffdf2b67bcd6f1ab56e04a1322b92dd0e/src/style.rs
use anstyle::AnsiColor::*;
use anstyle::Effects;
use anstyle::Style;

const HEADER: Style = Green.on_default().effects(Effects::BOLD);
const USAGE: Style = Green.on_default().effects(Effects::BOLD);
const LITERAL: Style = Cyan.on_default().effects(Effects::BOLD);
const PLACEHOLDER: Style = Cyan.on_default();
const ERROR: Style = Red.on_default().effects(Effects::BOLD);
const VALID: Style = Cyan.on_default().effects(Effects::BOLD);
const INVALID: Style = Yellow.on_default().effects(Effects::BOLD);

const APP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(HEADER)
    .usage(USAGE)
    .literal(LITERAL)
    .placeholder(PLACEHOLDER)
    .error(ERROR)
    .valid(VALID)
    .invalid(INVALID);

#[derive(Debug, Parser)]
#[command(name = "fetch-dependencies")]
#[command(version)]
#[command(about = "Fetch the library dependencies as git submodules.")]
#[command(long_about = None)]
#[command(styles = APP_STYLING)]
#[command(term_width = 80)]
struct Args {
    /// Path to the repository the dependencies are added to.
    #[arg(value_name = "root-relpath")]
    root: PathBuf,

    /// The executable used to run the fetch scripts of nested dependencies.
    #[arg(long = "python-executable", value_name = "EXEC", default_value = DEFAULT_EXECUTABLE)]
    executable: PathBuf,

    /// The branch all added submodules will switch to when added.
    #[arg(long, value_name = "BRANCH", default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Read the dependencies from a manifest instead of fetching vec-2D, debug-toolg and
    /// ini-parser.
    #[arg(long, short = 'm', value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// List the dependencies that would be fetched without fetching them.
    #[arg(long)]
    list: bool,

    /// Output format for --list.
    #[arg(long, short = 'f', value_enum, value_name = "FORMAT", requires = "list")]
    format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Output in JSON format
    Json,
    /// Output in TOML format
    Toml,
}

#[derive(Debug)]
pub enum ValidatedCommand {
    Fetch {
        dependencies: DependencySet,
        context: FetchContext,
    },
    List {
        dependencies: DependencySet,
        context: FetchContext,
        format: Option<OutputFormat>,
    },
}

impl ValidatedCommand {
    fn detect_root(root: PathBuf) -> Result<PathBuf, AppError> {
        if !root.is_dir() {
            return Err(AppError::arg_validation(format!(
                "root directory does not exist: {}",
                root.display()
            )));
        }
        Ok(root.canonicalize()?)
    }

    fn validate_branch(branch: String) -> Result<String, AppError> {
        if branch.trim().is_empty() {
            return Err(AppError::arg_validation(
                "branch name must not be empty".to_string(),
            ));
        }
        Ok(branch)
    }
}

impl TryFrom<Args> for ValidatedCommand {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let root = Self::detect_root(args.root)?;
        let mut context = FetchContext::new(root)
            .with_branch(Self::validate_branch(args.branch)?)
            .with_executable(args.executable);

        let dependencies = match args.manifest {
            Some(path) => {
                let manifest = Manifest::read(&path).map_err(|e| AppError::manifest(path, e))?;
                if let Some(remote) = manifest.remote {
                    context = context.with_remote(remote);
                }
                manifest.dependencies
            }
            None => default_dependencies(),
        };

        Ok(if args.list {
            ValidatedCommand::List {
                dependencies,
                context,
                format: args.format,
            }
        } else {
            ValidatedCommand::Fetch {
                dependencies,
                context,
            }
        })
    }
}

pub fn parse() -> Result<ValidatedCommand, AppError> {
    ValidatedCommand::try_from(Args::parse())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_root_given_uses_defaults() {
        let args = Args::try_parse_from(["fetch-dependencies", "./proj"]).unwrap();
        assert_eq!(args.root, PathBuf::from("./proj"));
        assert_eq!(args.branch, "master");
        assert_eq!(args.executable, PathBuf::from("python"));
        assert_eq!(args.manifest, None);
        assert!(!args.list);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "fetch-dependencies",
            "--python-executable",
            "python3",
            "--branch",
            "dev",
            ".",
        ])
        .unwrap();
        assert_eq!(args.branch, "dev");
        assert_eq!(args.executable, PathBuf::from("python3"));
    }

    #[test]
    fn root_is_required() {
        assert!(Args::try_parse_from(["fetch-dependencies"]).is_err());
    }

    #[test]
    fn format_requires_list() {
        assert!(Args::try_parse_from(["fetch-dependencies", ".", "--format", "json"]).is_err());
        assert!(
            Args::try_parse_from(["fetch-dependencies", ".", "--list", "--format", "json"]).is_ok()
        );
    }

    #[test]
    fn validated_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from(["fetch-dependencies", dir.path().to_str().unwrap()])
            .unwrap();
        match ValidatedCommand::try_from(args).unwrap() {
            ValidatedCommand::Fetch {
                dependencies,
                context,
            } => {
                assert_eq!(dependencies, default_dependencies());
                assert_eq!(context.folder, dir.path().canonicalize().unwrap());
                assert_eq!(context.branch, "master");
                assert_eq!(context.executable, PathBuf::from("python"));
            }
            other => panic!("expected a fetch, got {other:?}"),
        }
    }

    #[test]
    fn missing_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let args =
            Args::try_parse_from(["fetch-dependencies", missing.to_str().unwrap()]).unwrap();
        let err = ValidatedCommand::try_from(args).unwrap_err();
        assert_eq!(err.error_kind(), &crate::error::AppErrorKind::ArgValidation);
    }

    #[test]
    fn empty_branch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::try_parse_from([
            "fetch-dependencies",
            "--branch",
            "",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        let err = ValidatedCommand::try_from(args).unwrap_err();
        assert_eq!(err.error_kind(), &crate::error::AppErrorKind::ArgValidation);
    }

    #[test]
    fn manifest_remote_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("deps.toml");
        std::fs::write(
            &manifest,
            "[fetch-dependencies]\nremote = \"https://example.com/me\"\ndependencies = [\"one\"]\n",
        )
        .unwrap();
        let args = Args::try_parse_from([
            "fetch-dependencies",
            "--manifest",
            manifest.to_str().unwrap(),
            "--list",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        match ValidatedCommand::try_from(args).unwrap() {
            ValidatedCommand::List {
                dependencies,
                context,
                format,
            } => {
                assert_eq!(dependencies.len(), 1);
                assert_eq!(context.remote.base(), "https://example.com/me");
                assert_eq!(format, None);
            }
            other => panic!("expected a list, got {other:?}"),
        }
    }
}
