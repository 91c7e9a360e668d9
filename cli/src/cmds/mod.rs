use std::env;

use tracing::debug;

use crate::{App, Result};

mod gen;
mod init;
mod sync;

pub(crate) fn add_subcommands<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b> {
    app.subcommand(init::subcommand())
        .subcommand(sync::subcommand())
        .subcommand(gen::subcommand())
}

pub(crate) fn dispatch(app: &mut App) -> Result<()> {
    let matches = app.arg_matches.clone();
    // ^^ Need an independent copy of matches so we can still pass
    // the App struct through to subcommand imps.

    // All commands operate on the project in the working directory.
    let project_dir = env::current_dir()?;
    debug!(command = ?matches.subcommand_name(), ?project_dir, "dispatching");

    match matches.subcommand() {
        ("init", Some(m)) => init::run(app, &m, &project_dir),
        ("sync", Some(m)) => sync::run(app, &m, &project_dir),
        ("gen", Some(m)) => gen::run(app, &m, &project_dir),
        _ => unreachable!(),
        // unreachable: Should have exited out with appropriate help or
        // error message if no subcommand was given.
    }
}
