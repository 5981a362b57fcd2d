use std::path::PathBuf;
use std::process::ExitCode;

use fetch_dependencies::{FetchError, ManifestError};

/// Categories of application errors that can be matched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorKind {
    /// Argument validation errors
    ArgValidation,
    /// General IO errors
    IO,
    /// Manifest file reading errors
    ManifestRead,
    /// Manifest file parsing errors
    ManifestParse,
    /// A dependency could not be fetched
    Fetch,
    /// The dependency plan could not be formatted
    Format,
}

/// Internal error type that contains all application error variants.
#[derive(Debug, thiserror::Error)]
pub enum AppErrorInner {
    #[error("Argument error: {0}")]
    ArgValidation(String),
    #[error(transparent)]
    IO(#[from] std::io::Error),
    #[error("Failed to read manifest file: {}", manifest.display())]
    ManifestRead {
        manifest: PathBuf,
        #[source]
        err: ManifestError,
    },
    #[error("Failed to parse manifest file: {}", manifest.display())]
    ManifestParse {
        manifest: PathBuf,
        #[source]
        err: ManifestError,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to format the dependency list as JSON")]
    Json(#[from] serde_json::Error),
    #[error("Failed to format the dependency list as TOML")]
    Toml(#[from] toml::ser::Error),
}

/// The main application-level error type. This represents all top-level application errors we'd
/// want to report to the user. The kind is kept alongside the error so that it can be turned into
/// the right `ExitCode`: a dependency which failed to fetch exits with 1, bad arguments with 2 and
/// anything else with 3.
///
/// This type uses the newtype pattern to wrap a boxed inner error, reducing stack size.
#[derive(Debug)]
pub struct AppError(Box<AppErrorInner>, AppErrorKind);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl AppError {
    /// Create a new AppError with the given inner error and kind
    pub fn new(inner: AppErrorInner, kind: AppErrorKind) -> Self {
        Self(Box::new(inner), kind)
    }

    /// Get the error kind for pattern matching
    pub fn error_kind(&self) -> &AppErrorKind {
        &self.1
    }

    /// Create an argument validation error
    pub fn arg_validation(msg: String) -> Self {
        Self::new(AppErrorInner::ArgValidation(msg), AppErrorKind::ArgValidation)
    }

    /// Create a manifest error, distinguishing a manifest that couldn't be read from one that
    /// couldn't be parsed
    pub fn manifest(manifest: PathBuf, err: ManifestError) -> Self {
        match err {
            ManifestError::Read { .. } => Self::new(
                AppErrorInner::ManifestRead { manifest, err },
                AppErrorKind::ManifestRead,
            ),
            err => Self::new(
                AppErrorInner::ManifestParse { manifest, err },
                AppErrorKind::ManifestParse,
            ),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::new(AppErrorInner::IO(err), AppErrorKind::IO)
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        Self::new(AppErrorInner::Fetch(err), AppErrorKind::Fetch)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(AppErrorInner::Json(err), AppErrorKind::Format)
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        Self::new(AppErrorInner::Toml(err), AppErrorKind::Format)
    }
}

impl From<AppError> for ExitCode {
    fn from(error: AppError) -> Self {
        ExitCode::from(match error.error_kind() {
            AppErrorKind::Fetch => 1,
            AppErrorKind::ArgValidation => 2,
            _ => 3,
        })
    }
}

/// Print `error` and everything that caused it.
pub fn report(error: &AppError) {
    eprintln!("❌ {error}");
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("   caused by: {cause}");
        source = cause.source();
    }
}
