//! This crate runs the external programs `proto` depends on: `git` to fetch
//! the remote proto repository and `protoc` to generate SDK code.
//!
//! **IMPORTANT NOTE:** Both programs must be installed on the host. Their
//! absence is reported as `Error::ToolMissing` with an install hint rather
//! than as an I/O error.

#![deny(warnings)]

mod git;

pub mod fetch;
pub use fetch::{fetch_and_list, Checkout};

pub mod generate;
pub use generate::{generate, Toolchain};

pub mod sync;
pub use sync::{resolve_module, sync, SyncOutcome};

pub mod tree;

mod temp_git_repo;
pub use temp_git_repo::TempGitRepo;
