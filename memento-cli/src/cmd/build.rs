use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use memento_core::build_site;
use tracing::info;

use crate::config::MementoConfig;

/// Path arguments shared by every command that reads the site sources.
pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("FILE")
                .help("Category data file [default: ./data/commands.json]"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Theme directory holding index.html [default: ./theme]"),
        )
        .arg(
            Arg::new("public")
                .short('p')
                .long("public")
                .value_name("DIR")
                .help("Static assets copied into the output [default: ./public]"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated site [default: ./out]"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: ./memento.toml]"),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build"))
        .about("Build the cheat sheet with its sections prerendered")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = MementoConfig::load(args)?;
    let paths = config.build_config().paths();

    let index = build_site(&config.site, &paths)?;
    info!("site built successfully in {}", paths.output.display());
    info!("entry point: {}", index.display());

    Ok(())
}
