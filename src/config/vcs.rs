//! Version-control presence checks for local config files.
//!
//! All checks are best-effort: a missing `git` binary, or a working directory that
//! is not a repository, simply disables them.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Capability to ask whether paths are under version control.
pub trait VersionControl {
    /// Whether the version-control tool can be run at all.
    fn is_available(&self) -> bool;

    /// Whether the working directory is inside a repository.
    fn is_repository(&self) -> bool;

    /// Whether `path` is tracked by the repository.
    fn is_tracked(&self, path: &Path) -> bool;
}

/// Git, invoked through the `git` command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    fn run(args: &[&str]) -> Option<std::process::Output> {
        match Command::new("git")
            .args(args)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => Some(output),
            Err(e) => {
                debug!(error = %e, ?args, "git could not be run");
                None
            }
        }
    }
}

impl VersionControl for GitCli {
    fn is_available(&self) -> bool {
        Self::run(&["--version"]).is_some_and(|out| out.status.success())
    }

    fn is_repository(&self) -> bool {
        Self::run(&["rev-parse", "--is-inside-work-tree"]).is_some_and(|out| {
            out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "true"
        })
    }

    fn is_tracked(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        Self::run(&["ls-files", "--error-unmatch", "--", path.as_ref()])
            .is_some_and(|out| out.status.success())
    }
}

/// No version control: every check is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVersionControl;

impl VersionControl for NoVersionControl {
    fn is_available(&self) -> bool {
        false
    }

    fn is_repository(&self) -> bool {
        false
    }

    fn is_tracked(&self, _path: &Path) -> bool {
        false
    }
}
