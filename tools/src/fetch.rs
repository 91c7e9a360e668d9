use std::path::{Component, Path, PathBuf};

use protosync_core::{Error, Result};
use tempfile::TempDir;
use tracing::info;

use crate::{git, tree};

const NO_PROTOS_HINT: &str = "Please check that:\n\
    1. remote_path in .protorc is correct\n\
    2. The repository contains .proto files\n\
    3. The files are in the expected location";

/// A scratch clone of the remote repository together with the proto files
/// found in it.
///
/// The clone is deleted when the `Checkout` is dropped.
#[derive(Debug)]
pub struct Checkout {
    scratch: TempDir,
    revision: String,
    source_dir: PathBuf,
    proto_files: Vec<PathBuf>,
}

impl Checkout {
    /// Return the revision the clone was made at.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Return the root of the scratch clone.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Return the directory inside the clone that was searched for protos.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Return the proto files found, relative to `source_dir` and sorted.
    pub fn proto_files(&self) -> &[PathBuf] {
        &self.proto_files
    }
}

/// Clone `branch` of `repo_url` into a fresh scratch directory, resolve its
/// revision, and list the `.proto` files under `sub_path` (or the whole
/// repository when `sub_path` is `None` or empty).
///
/// Fails with `Error::CloneFailed` if git can't clone, `Error::PathNotFound`
/// if `sub_path` is not a directory of the clone, and `Error::NoProtoFiles`
/// if the searched directory holds no proto files. The last two carry a
/// listing of the clone to help the user find the right path.
pub fn fetch_and_list(repo_url: &str, branch: &str, sub_path: Option<&str>) -> Result<Checkout> {
    let scratch = tempfile::Builder::new().prefix("proto-sync-").tempdir()?;

    info!(repo_url, branch, "cloning");
    git::clone(repo_url, branch, scratch.path())?;

    let revision = git::head_revision(scratch.path())?;
    info!(%revision, "clone ready");

    let sub_path = sub_path.filter(|p| !p.trim().is_empty());

    let source_dir = match sub_path {
        None => scratch.path().to_path_buf(),
        Some(raw) => match clean_sub_path(raw) {
            Some(rel) if scratch.path().join(&rel).is_dir() => scratch.path().join(rel),
            _ => {
                return Err(Error::PathNotFound {
                    path: raw.to_string(),
                    listing: tree::render(scratch.path())?,
                });
            }
        },
    };

    let proto_files = tree::find_protos(&source_dir)?;
    if proto_files.is_empty() {
        return Err(Error::NoProtoFiles {
            dir: sub_path.unwrap_or("the repository root").to_string(),
            listing: tree::describe(&source_dir)?,
            hint: NO_PROTOS_HINT,
        });
    }

    info!(count = proto_files.len(), "found proto files");

    Ok(Checkout {
        scratch,
        revision,
        source_dir,
        proto_files,
    })
}

// Normalize a user-supplied sub-path: strip surrounding quotes, `.` and
// leading `/` components. Returns `None` for paths that climb out of the
// clone with `..`.
fn clean_sub_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim().trim_matches(|c: char| c == '"' || c == '\'');

    let mut rel = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::ParentDir => return None,
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    Some(rel)
}
