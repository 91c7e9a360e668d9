use std::path::PathBuf;

use thiserror::Error;

/// Describes the error conditions that can arise while syncing proto
/// sources or generating SDKs from them.
///
/// Several variants carry remediation hints in their message because the
/// command-line tool prints the error as its final word to the user.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration not initialized; run 'proto init' first")]
    ConfigMissing,

    #[error("unable to parse config file {path}: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unable to encode config: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error(
        "unable to clone {url} (branch {branch})\n{stderr}\n\nCommon issues:\n\
         1. Incorrect repository URL\n\
         2. Private repository (requires authentication)\n\
         3. Incorrect branch name\n\
         4. Network connectivity issues"
    )]
    CloneFailed {
        url: String,
        branch: String,
        stderr: String,
    },

    #[error("unable to resolve HEAD revision of clone: {0}")]
    RevisionUnresolved(String),

    #[error(
        "remote path '{path}' does not exist in the repository\n\n\
         Repository structure:\n\
         ----------------------------------------\n\
         {listing}\
         ----------------------------------------\n\n\
         Please check that remote_path in .protorc names a directory in the repository"
    )]
    PathNotFound { path: String, listing: String },

    #[error(
        "no proto files found in {dir}\n\n\
         Directory structure:\n\
         ----------------------------------------\n\
         {listing}\
         ----------------------------------------\n\n\
         {hint}"
    )]
    NoProtoFiles {
        dir: String,
        listing: String,
        hint: &'static str,
    },

    #[error("{tool} not found\n\nPlease install it using:\n{install_hint}")]
    ToolMissing {
        tool: String,
        install_hint: String,
    },

    #[error("protoc failed for {file} ({status})\n{output}")]
    CompilationFailed {
        file: PathBuf,
        status: String,
        output: String,
    },

    #[error("unsupported SDK type '{0}'; use 'go' or 'python'")]
    UnsupportedLanguage(String),

    #[error("unable to {action} proto file {path}: {source}")]
    ProtoIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

/// A specialized `Result` type for protosync operations.
pub type Result<T> = std::result::Result<T, Error>;
