use std::{io::Write, path::Path};

use super::{App, Result};

use clap::{ArgMatches, SubCommand};
use protosync_core::config;
use protosync_tools::SyncOutcome;

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("sync")
        .about("Fetch proto files from the remote repository if it has changed")
}

pub(crate) fn run(app: &mut App, _sync_matches: &ArgMatches, project_dir: &Path) -> Result<()> {
    let mut config = config::load(project_dir)?;

    let revision = match protosync_tools::sync(&config, project_dir)? {
        SyncOutcome::UpToDate { revision } => {
            writeln!(app, "Already up to date")?;
            revision
        }
        SyncOutcome::Synced { revision, files } => {
            writeln!(
                app,
                "Synced {} proto files at {}",
                files.len(),
                short(&revision)
            )?;
            for file in &files {
                writeln!(app, "  {}", file.display())?;
            }
            revision
        }
    };

    if config.last_revision.as_deref() != Some(revision.as_str()) {
        config.last_revision = Some(revision);
        config::save(project_dir, &config)?;
    }

    Ok(())
}

fn short(revision: &str) -> &str {
    revision.get(..12).unwrap_or(revision)
}
