//! The `proto sync` workflow.
//!
//! ```text
//! Idle -> Cloning -> RevisionCompare -> UpToDate
//!                                    -> Rewriting -> Copying -> CacheUpdate
//! ```
//!
//! Nothing is written to the proto directory unless the remote revision
//! differs from the cached one, and the cache is updated only after every
//! file has been copied.

use std::{
    fs,
    path::{Path, PathBuf},
};

use protosync_core::{
    cache, go_module, module_from_repo_url, rewrite, Config, Error, Language, Result,
};
use tracing::info;

use crate::fetch_and_list;

/// What a sync did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote is still at the revision synced last time.
    UpToDate { revision: String },

    /// Proto files were rewritten and copied. `files` are relative to the
    /// local proto directory.
    Synced {
        revision: String,
        files: Vec<PathBuf>,
    },
}

/// Sync the proto files described by `config` into the project rooted at
/// `project_dir`.
pub fn sync(config: &Config, project_dir: &Path) -> Result<SyncOutcome> {
    config.ensure_initialized()?;

    let checkout = fetch_and_list(
        &config.repo_url,
        &config.branch,
        config.remote_path.as_deref(),
    )?;
    let revision = checkout.revision().to_string();

    let proto_dir = config.proto_dir_in(project_dir);
    if cache::load_last_revision(&proto_dir)?.as_deref() == Some(revision.as_str()) {
        info!(%revision, "already up to date");
        return Ok(SyncOutcome::UpToDate { revision });
    }

    let language = Language::detect(project_dir);
    let module = resolve_module(config, project_dir, language)?;
    info!(%language, %module, "rewriting proto headers");

    let mut files = Vec::with_capacity(checkout.proto_files().len());
    for rel in checkout.proto_files() {
        let content = fs::read_to_string(checkout.source_dir().join(rel)).map_err(|source| {
            Error::ProtoIo {
                action: "read",
                path: rel.clone(),
                source,
            }
        })?;

        let file_module = match language {
            Language::Go => rewrite::import_path(&module, rel),
            Language::Python => module.clone(),
        };
        let rewritten = rewrite::rewrite(&content, &file_module, language);

        rewrite::copy_into(&proto_dir, rel, &rewritten)?;
        files.push(rel.clone());
    }

    cache::save_last_revision(&proto_dir, &revision)?;
    info!(%revision, count = files.len(), "proto files synced");

    Ok(SyncOutcome::Synced { revision, files })
}

/// Module name injected into rewritten headers: the configured name, else
/// the `go.mod` module of a Go project, else one derived from the
/// repository URL.
pub fn resolve_module(config: &Config, project_dir: &Path, language: Language) -> Result<String> {
    if let Some(module) = config.module_name.as_deref().filter(|m| !m.is_empty()) {
        return Ok(module.to_string());
    }

    if language == Language::Go {
        if let Some(module) = go_module(project_dir)? {
            return Ok(module);
        }
    }

    Ok(module_from_repo_url(&config.repo_url))
}
