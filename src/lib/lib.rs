//! Fetch the source dependencies of a project as git submodules, recursively.
//!
//! Each dependency is a repository hosted under a single account (by default
//! `https://github.com/ismawno`) and is added as a submodule at a directory of the same name.
//! After being added it is switched to the requested branch. If it has a `scripts` directory it
//! declares dependencies of its own, which are fetched in turn:
//!
//! - from `scripts/dependencies.toml`, in-process, with the dependency as the new root;
//! - otherwise by running `scripts/fetch_dependencies.py` from within the dependency with the same
//!   executable and branch.
//!
//! Requires `git` to be installed and available on `PATH`.
//!
//! # Usage
//!
//! Declare dependencies in a manifest:
//!
//! ```rust
//! use fetch_dependencies::Manifest;
//!
//! let manifest = Manifest::try_parse_toml(r#"
//! [fetch-dependencies]
//! dependencies = ["vec-2D", "debug-toolg", "ini-parser"]
//! "#)?;
//! assert_eq!(manifest.dependencies.len(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Fetch them into a repository, reporting progress as it happens:
//!
//! ```rust,no_run
//! use fetch_dependencies::{Event, FetchContext, Fetcher, System, default_dependencies};
//!
//! let context = FetchContext::new("path/to/project").with_branch("dev");
//! let mut fetcher = Fetcher::new(System, |event: &Event<'_>| println!("{event}"));
//! fetcher.fetch(&default_dependencies(), &context)?;
//! # Ok::<(), fetch_dependencies::FetchError>(())
//! ```
//!
//! Nothing is rolled back when a step fails. Dependencies whose directory already exists are
//! skipped, so running the fetch again resumes where it stopped.

pub mod dependency;
mod error;
pub mod fetch;
mod git;
pub mod manifest;
pub mod process;

#[doc(inline)]
pub use crate::dependency::{
    DependencyName, DependencySet, Remote, default_dependencies, try_parse_names,
};
#[doc(inline)]
pub use crate::error::{Error, FetchError, Stage};
#[doc(inline)]
pub use crate::fetch::{
    Event, EventKind, FetchContext, Fetcher, PlannedDependency, fetch,
};
#[doc(inline)]
pub use crate::manifest::{Manifest, ManifestError};
#[doc(inline)]
pub use crate::process::{Execute, System};
