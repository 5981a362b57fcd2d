use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::Error;

/// Runs the commands prepared while fetching dependencies.
pub trait Execute {
    /// Run `command` to completion. A non-zero exit status is an error.
    fn execute(&mut self, command: &mut Command) -> Result<(), Error>;
}

impl<E: Execute + ?Sized> Execute for &mut E {
    fn execute(&mut self, command: &mut Command) -> Result<(), Error> {
        (**self).execute(command)
    }
}

/// Executes commands as child processes of this one.
#[derive(Debug, Default, Clone, Copy)]
pub struct System;

impl Execute for System {
    fn execute(&mut self, command: &mut Command) -> Result<(), Error> {
        let output = command
            .output()
            .map_err(|err| Error::spawn(describe(command), err))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::subprocess(
                describe(command),
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ))
        }
    }
}

/// Render a command as it would be typed in a shell (without quoting).
pub fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Make `program` absolute when it is a relative path rather than a bare name looked up on
/// `PATH`, so that it names the same file from any working directory.
pub(crate) fn resolve_program(program: &Path) -> std::io::Result<PathBuf> {
    if program.is_relative() && program.components().count() > 1 {
        std::path::absolute(program)
    } else {
        Ok(program.to_path_buf())
    }
}

/// Run a dependency's own fetch script (given relative to `dir`) from within its directory. The
/// script inherits the terminal, so whatever it prints reaches the user directly.
pub(crate) fn nested_fetch_task(
    executable: &Path,
    script: &Path,
    branch: &str,
    dir: &Path,
) -> Command {
    let mut task = Command::new(executable);
    task.arg(script)
        .arg("--python-executable")
        .arg(executable)
        .args(["--branch", branch, "."]);
    task.current_dir(dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    task
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn describe_joins_program_and_args() {
        let mut command = Command::new("git");
        command.args(["-C", "some dir", "checkout", "master"]);
        assert_eq!(describe(&command), "git -C some dir checkout master");
    }

    #[test]
    fn nested_fetch_task_arguments() {
        let task = nested_fetch_task(
            Path::new("python3"),
            Path::new("scripts/fetch_dependencies.py"),
            "dev",
            Path::new("/root/dep"),
        );
        assert_eq!(
            describe(&task),
            "python3 scripts/fetch_dependencies.py --python-executable python3 --branch dev ."
        );
        assert_eq!(task.get_current_dir(), Some(Path::new("/root/dep")));
    }

    #[test]
    fn bare_program_names_are_left_for_path_lookup() {
        assert_eq!(resolve_program(Path::new("python3")).unwrap(), Path::new("python3"));
        assert_eq!(
            resolve_program(Path::new("/usr/bin/python3")).unwrap(),
            Path::new("/usr/bin/python3")
        );
    }

    #[test]
    fn relative_program_paths_are_made_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let resolved = resolve_program(Path::new("venv/bin/python")).unwrap();
        assert!(resolved.is_absolute());
        assert_eq!(resolved, cwd.join("venv/bin/python"));
        assert!(resolve_program(Path::new("./bin/python")).unwrap().is_absolute());
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mut command = Command::new("fetch-dependencies-no-such-program");
        assert!(matches!(
            System.execute(&mut command),
            Err(Error::Spawn { command, .. }) if command == "fetch-dependencies-no-such-program"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_captures_stderr() {
        let mut command = Command::new("sh");
        command.args(["-c", "echo 'remote not found' >&2; exit 3"]);
        match System.execute(&mut command) {
            Err(Error::Subprocess { status, stderr, .. }) => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr, "remote not found");
            }
            other => panic!("expected a subprocess error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn successful_command() {
        let mut command = Command::new("true");
        assert!(System.execute(&mut command).is_ok());
    }
}
