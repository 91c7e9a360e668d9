use std::{io::Write, path::Path};

use super::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use protosync_core::{config, go_module, Language};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("gen")
        .alias("build")
        .about("Generate an SDK from the synced proto files")
        .arg(
            Arg::with_name("language")
                .required(true)
                .value_name("LANGUAGE")
                .help("SDK to generate: go or python"),
        )
        .arg(
            Arg::with_name("module")
                .long("module")
                .value_name("NAME")
                .takes_value(true)
                .help("Go module that generated packages are imported under"),
        )
}

pub(crate) fn run(app: &mut App, gen_matches: &ArgMatches, project_dir: &Path) -> Result<()> {
    // Reject the language before touching the config or spawning anything.
    let language: Language = gen_matches
        .value_of("language")
        .unwrap_or_default()
        .parse()?;

    let config = config::load(project_dir)?;
    config.ensure_initialized()?;

    let module = match language {
        Language::Go => match gen_matches.value_of("module") {
            Some(module) => Some(module.to_string()),
            None => match config.module_name.clone() {
                Some(module) => Some(module),
                None => go_module(project_dir)?,
            },
        },
        Language::Python => None,
    };

    let build_dir = config.build_dir_in(project_dir);
    let files = protosync_tools::generate(
        language,
        &config.proto_dir_in(project_dir),
        &build_dir,
        module.as_deref(),
    )?;

    writeln!(
        app,
        "Generated {} SDK from {} proto files in {}",
        language,
        files.len(),
        config.build_dir.display()
    )?;

    Ok(())
}
