//! The `.protorc` configuration record.
//!
//! The file lives in the project's working directory and is stored as TOML.
//! Directory fields are interpreted relative to that same directory.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Error, Result};

/// Name of the configuration file inside the project directory.
pub const CONFIG_FILE_NAME: &str = ".protorc";

/// Everything `proto sync` and `proto gen` need to know about a project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the remote repository holding the `.proto` sources.
    pub repo_url: String,

    pub branch: String,

    /// Sub-directory of the remote repository to search for proto files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_path: Option<String>,

    pub proto_dir: PathBuf,
    pub build_dir: PathBuf,

    /// Revision recorded by the most recent successful sync.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_revision: Option<String>,

    /// Module or package name injected into rewritten proto headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
}

impl Config {
    /// A zero-valued record (as returned for a missing file) is not
    /// initialized. `proto init` always sets the repository URL.
    pub fn is_initialized(&self) -> bool {
        !self.repo_url.is_empty()
    }

    /// Returns `Err(Error::ConfigMissing)` unless the record is initialized.
    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::ConfigMissing)
        }
    }

    /// Resolve the local proto directory against the project root.
    pub fn proto_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.proto_dir)
    }

    /// Resolve the SDK output directory against the project root.
    pub fn build_dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.build_dir)
    }

    /// Render the record exactly as `save` would write it.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Returns the path of the configuration file for the given project directory.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load the configuration stored in `dir`.
///
/// A missing file is not an error: it yields `Config::default()`, which
/// reports itself as not initialized.
pub fn load(dir: &Path) -> Result<Config> {
    let path = config_path(dir);

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(?path, "config file not found, using empty config");
            return Ok(Config::default());
        }
        Err(err) => return Err(err.into()),
    };

    toml::from_str(&text).map_err(|source| Error::ConfigInvalid { path, source })
}

/// Write the full configuration record to `dir`, replacing any previous file.
///
/// The record is written to a temporary file in the same directory and then
/// renamed into place, so readers see either the old or the new record.
pub fn save(dir: &Path, config: &Config) -> Result<()> {
    fs::create_dir_all(dir)?;

    let text = config.to_toml()?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;

    // NamedTempFile is created 0600. Keep the mode of the file being
    // replaced, or 0644 for a new one.
    let path = config_path(dir);
    match fs::metadata(&path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(_) => set_default_mode(tmp.as_file())?,
    }

    tmp.persist(&path).map_err(|e| e.error)?;

    info!(?path, "config saved");
    Ok(())
}

#[cfg(unix)]
fn set_default_mode(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_mode(_file: &fs::File) -> io::Result<()> {
    Ok(())
}
