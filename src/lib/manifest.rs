//! Dependency sets declared in TOML.
//!
//! A manifest holds a `fetch-dependencies` table, either at the top level or as
//! `package.metadata.fetch-dependencies` inside a `Cargo.toml`:
//!
//! ```toml
//! [fetch-dependencies]
//! remote = "https://github.com/ismawno"
//! dependencies = ["vec-2D", "debug-toolg", "ini-parser"]
//! ```
//!
//! `remote` is optional. When absent, dependencies are fetched from the remote already in use.

use std::path::{Path, PathBuf};

use crate::dependency::{DependencySet, Remote, try_parse_names};

/// The name of the table holding the manifest.
pub const MANIFEST_TABLE: &str = "fetch-dependencies";

/// The manifest a dependency ships (under its `scripts` directory) to declare its own dependencies.
pub const NESTED_MANIFEST: &str = "dependencies.toml";

/// Errors encountered when reading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Neither `fetch-dependencies` nor `package.metadata.fetch-dependencies` was found.
    #[error(
        "required table 'fetch-dependencies' or 'package.metadata.fetch-dependencies' not found"
    )]
    TableNotFound,

    /// A dependency name can't be used as a directory name.
    #[error("invalid dependency name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The remote isn't a URL.
    #[error("invalid remote '{remote}'")]
    InvalidRemote {
        remote: String,
        #[source]
        err: url::ParseError,
    },

    /// The remote is a URL which can't have a path appended to it.
    #[error("remote '{remote}' cannot be used as a base URL")]
    RemoteNotBase { remote: String },

    /// A toml deserialisation error occurred.
    #[error(transparent)]
    TomlInvalid(#[from] toml::de::Error),

    /// The manifest file couldn't be read.
    #[error("failed to read manifest {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestTable {
    remote: Option<String>,
    dependencies: Vec<String>,
}

/// A parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Overrides the remote for these dependencies (and anything nested beneath them).
    pub remote: Option<Remote>,
    pub dependencies: DependencySet,
}

impl Manifest {
    fn from_table(table: &toml::Table) -> Result<Self, ManifestError> {
        let table = toml::Value::Table(table.to_owned()).try_into::<ManifestTable>()?;
        Ok(Self {
            remote: table.remote.map(Remote::parse).transpose()?,
            dependencies: try_parse_names(table.dependencies)?,
        })
    }

    /// Parse a manifest document.
    pub fn try_parse_toml<S: AsRef<str>>(toml_str: S) -> Result<Self, ManifestError> {
        let document = toml_str.as_ref().parse::<toml::Table>()?;
        let table = document
            .get(MANIFEST_TABLE)
            .or_else(|| {
                document
                    .get("package")
                    .and_then(|v| v.get("metadata"))
                    .and_then(|v| v.get(MANIFEST_TABLE))
            })
            .and_then(|v| v.as_table())
            .ok_or(ManifestError::TableNotFound)?;
        Self::from_table(table)
    }

    /// Read and parse the manifest at `path`.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|err| ManifestError::Read {
            path: path.to_path_buf(),
            err,
        })?;
        Self::try_parse_toml(document)
    }
}

#[cfg(test)]
use ManifestError::*;
