use std::{
    ffi::OsStr,
    io,
    path::Path,
    process::{Command, Output},
};

use protosync_core::{Error, Result};
use tracing::debug;

const INSTALL_HINT: &str = "https://git-scm.com/downloads (or your package manager)";

fn git<I, S>(args: I, dir: Option<&Path>) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    debug!(?cmd, "running git");

    cmd.output().map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            Error::ToolMissing {
                tool: "git".to_string(),
                install_hint: INSTALL_HINT.to_string(),
            }
        } else {
            err.into()
        }
    })
}

/// Clone the single branch `branch` of `url` into the (empty or missing)
/// directory `dest`.
pub(crate) fn clone(url: &str, branch: &str, dest: &Path) -> Result<()> {
    let args = [
        OsStr::new("clone"),
        OsStr::new("--quiet"),
        OsStr::new("--single-branch"),
        OsStr::new("--branch"),
        OsStr::new(branch),
        OsStr::new("--"),
        OsStr::new(url),
        dest.as_os_str(),
    ];
    let output = git(&args, None)?;

    if !output.status.success() {
        return Err(Error::CloneFailed {
            url: url.to_string(),
            branch: branch.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}

/// Resolve the commit that `HEAD` points to in the checkout at `repo_dir`.
pub(crate) fn head_revision(repo_dir: &Path) -> Result<String> {
    let output = git(&["rev-parse", "HEAD"], Some(repo_dir))?;

    if !output.status.success() {
        return Err(Error::RevisionUnresolved(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if revision.is_empty() {
        return Err(Error::RevisionUnresolved(
            "git rev-parse printed nothing".to_string(),
        ));
    }

    Ok(revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::TempGitRepo;

    #[test]
    fn clone_and_resolve_head() {
        let mut remote = TempGitRepo::new();
        remote.write_file("a.proto", "syntax = \"proto3\";\n");
        remote.commit_all("first");

        let dest = tempfile::tempdir().unwrap();
        clone(&remote.url(), "main", dest.path()).unwrap();

        assert!(dest.path().join("a.proto").is_file());
        assert_eq!(head_revision(dest.path()).unwrap(), remote.head_revision());
    }

    #[test]
    fn clone_unknown_branch() {
        let mut remote = TempGitRepo::new();
        remote.write_file("a.proto", "");
        remote.commit_all("first");

        let dest = tempfile::tempdir().unwrap();
        let err = clone(&remote.url(), "no-such-branch", dest.path()).unwrap_err();

        if let Error::CloneFailed { branch, stderr, .. } = err {
            assert_eq!(branch, "no-such-branch");
            assert!(stderr.contains("no-such-branch"), "stderr was: {}", stderr);
        } else {
            panic!("wrong error: {:?}", err);
        }
    }

    #[test]
    fn head_of_non_repo() {
        let dir = tempfile::tempdir().unwrap();

        let err = head_revision(dir.path()).unwrap_err();
        if let Error::RevisionUnresolved(_) = err {
            // expected
        } else {
            panic!("wrong error: {:?}", err);
        }
    }
}
