//! Side-car record of the last synced revision.
//!
//! The record sits inside the local proto directory, so wiping that directory
//! also forgets the revision and forces the next sync to copy everything again.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Result;

/// Name of the side-car file inside the proto directory.
pub const CACHE_FILE_NAME: &str = ".proto_cache";

#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    revision: String,
}

/// Returns the path of the cache record for the given proto directory.
pub fn cache_path(proto_dir: &Path) -> PathBuf {
    proto_dir.join(CACHE_FILE_NAME)
}

/// Returns the revision recorded by the last successful sync into
/// `proto_dir`, or `None` if it has never been synced.
///
/// A record that cannot be decoded is treated as absent. The next sync then
/// copies everything and overwrites it.
pub fn load_last_revision(proto_dir: &Path) -> Result<Option<String>> {
    let path = cache_path(proto_dir);

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(?path, "no cache record");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    match toml::from_str::<CacheRecord>(&text) {
        Ok(record) => Ok(Some(record.revision)),
        Err(err) => {
            warn!(?path, %err, "ignoring unreadable cache record");
            Ok(None)
        }
    }
}

/// Record `revision` as the last synced revision of `proto_dir`.
pub fn save_last_revision(proto_dir: &Path, revision: &str) -> Result<()> {
    fs::create_dir_all(proto_dir)?;

    let record = CacheRecord {
        revision: revision.to_string(),
    };
    let text = toml::to_string(&record)?;

    fs::write(cache_path(proto_dir), text)?;
    debug!(revision, "cache record updated");
    Ok(())
}
