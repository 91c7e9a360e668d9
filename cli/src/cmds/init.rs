use std::{fs, io::Write, path::Path};

use super::{App, Result};

use clap::{Arg, ArgMatches, SubCommand};
use protosync_core::{config, Config};

pub(crate) fn subcommand<'a, 'b>() -> clap::App<'a, 'b> {
    SubCommand::with_name("init")
        .about("Write the .protorc configuration for this project")
        .arg(
            Arg::with_name("url")
                .long("url")
                .value_name("URL")
                .takes_value(true)
                .empty_values(false)
                .required(true)
                .help("Remote repository holding the proto files"),
        )
        .arg(
            Arg::with_name("branch")
                .long("branch")
                .value_name("BRANCH")
                .takes_value(true)
                .default_value("main")
                .help("Branch to sync from"),
        )
        .arg(
            Arg::with_name("remote-path")
                .long("remote-path")
                .alias("sub-path")
                .value_name("PATH")
                .takes_value(true)
                .help("Directory inside the repository that holds the proto files"),
        )
        .arg(
            Arg::with_name("proto-dir")
                .long("proto-dir")
                .value_name("DIR")
                .takes_value(true)
                .default_value("./proto")
                .help("Local directory the proto files are synced into"),
        )
        .arg(
            Arg::with_name("build-dir")
                .long("build-dir")
                .value_name("DIR")
                .takes_value(true)
                .default_value("./gen")
                .help("Local directory generated SDK code is written to"),
        )
        .arg(
            Arg::with_name("module")
                .long("module")
                .value_name("NAME")
                .takes_value(true)
                .help("Module name injected into proto headers (defaults to the go.mod module or the repository URL)"),
        )
}

pub(crate) fn run(app: &mut App, init_matches: &ArgMatches, project_dir: &Path) -> Result<()> {
    let value = |name: &str| init_matches.value_of(name).unwrap_or_default();
    let optional = |name: &str| {
        init_matches
            .value_of(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    };

    let config = Config {
        repo_url: value("url").trim().to_string(),
        branch: value("branch").to_string(),
        remote_path: optional("remote-path"),
        proto_dir: value("proto-dir").into(),
        build_dir: value("build-dir").into(),
        last_revision: None,
        module_name: optional("module"),
    };

    let proto_dir = config.proto_dir_in(project_dir);
    let build_dir = config.build_dir_in(project_dir);
    fs::create_dir_all(&proto_dir)?;
    fs::create_dir_all(&build_dir)?;

    config::save(project_dir, &config)?;

    writeln!(app, "Configuration initialized successfully")?;
    writeln!(app)?;
    write!(app, "{}", config.to_toml()?)?;
    writeln!(app)?;
    writeln!(app, "Created directories:")?;
    writeln!(app, "  {}", config.proto_dir.display())?;
    writeln!(app, "  {}", config.build_dir.display())?;

    Ok(())
}
