//! This crate implements the data model of `proto`: the project
//! configuration, the record of the last synced revision, and the
//! rewriting of proto file headers. It never spawns processes.

#![deny(warnings)]

pub mod cache;
pub mod config;
pub use config::Config;

mod error;
pub use error::{Error, Result};

mod language;
pub use language::{go_module, module_from_repo_url, Language};

pub mod rewrite;
