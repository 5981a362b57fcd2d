use crate::manifest::ManifestError;

/// The main error enum for this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to run '{command}'")]
    Spawn {
        command: String,
        #[source]
        err: std::io::Error,
    },
    #[error("Command '{command}' exited with status {status}{}", on_next_line(.stderr))]
    Subprocess {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

fn on_next_line(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("\n{text}")
    }
}

impl Error {
    pub(crate) fn spawn(command: String, err: std::io::Error) -> Self {
        Self::Spawn { command, err }
    }

    pub(crate) fn subprocess(command: String, status: std::process::ExitStatus, stderr: String) -> Self {
        Self::Subprocess {
            command,
            status,
            stderr: stderr.trim_end().to_string(),
        }
    }
}

/// The step of fetching a dependency which failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Adding the dependency as a submodule.
    Acquire,
    /// Checking out the requested branch.
    SwitchBranch,
    /// Fetching the dependency's own dependencies.
    Nested,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Acquire => write!(f, "add submodule"),
            Self::SwitchBranch => write!(f, "switch branch of"),
            Self::Nested => write!(f, "fetch nested dependencies of"),
        }
    }
}

/// Records the dependency which could not be fetched, and why.
#[derive(Debug, thiserror::Error)]
#[error("failed to {stage} '{dependency}'")]
pub struct FetchError {
    pub dependency: String,
    pub stage: Stage,
    #[source]
    pub err: Error,
}

impl FetchError {
    pub(crate) fn new<E: Into<Error>>(dependency: &str, stage: Stage, err: E) -> Self {
        Self {
            dependency: dependency.to_string(),
            stage,
            err: err.into(),
        }
    }
}

#[cfg(all(test, unix))]
mod test {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    fn exit_status(code: i32) -> std::process::ExitStatus {
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[test]
    fn subprocess_error_with_stderr() {
        let err = Error::subprocess(
            "git checkout dev".into(),
            exit_status(1),
            "no such branch\n".into(),
        );
        assert_eq!(
            err.to_string(),
            "Command 'git checkout dev' exited with status exit status: 1\nno such branch"
        );
    }

    #[test]
    fn subprocess_error_without_stderr_has_no_trailing_newline() {
        let err = Error::subprocess(
            "sh scripts/fetch_dependencies.py".into(),
            exit_status(2),
            String::new(),
        );
        assert_eq!(
            err.to_string(),
            "Command 'sh scripts/fetch_dependencies.py' exited with status exit status: 2"
        );
    }
}
