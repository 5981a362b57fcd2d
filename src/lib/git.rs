//! The `git` commands used to add and check out dependencies.
//!
//! Every command is given the repository it acts on with `-C`, so the working directory of this
//! process is never changed.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::dependency::DependencyName;

fn git_in<P: AsRef<Path>>(dir: P) -> Command {
    let mut git = Command::new("git");
    git.arg("-C").arg(dir.as_ref());
    git.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(Stdio::null());
    git
}

/// Add `url` as a submodule of the repository at `folder`, at the path `name`.
pub(crate) fn submodule_add_task<P: AsRef<Path>>(
    folder: P,
    url: &str,
    name: &DependencyName,
) -> Command {
    let mut git = git_in(folder);
    git.args(["submodule", "add", url, name.as_str()]);
    git
}

/// Check out `branch` in the repository at `repo`.
pub(crate) fn checkout_task<P: AsRef<Path>>(repo: P, branch: &str) -> Command {
    let mut git = git_in(repo);
    git.args(["checkout", branch]);
    git
}
