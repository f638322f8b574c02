use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use memento_core::{ContentModel, prerender, prerender_file};

use crate::config::MementoConfig;

pub fn make_subcommand() -> Command {
    Command::new("render")
        .about("Prerender the sections and print the markup, or inject it into a built page")
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("FILE")
                .help("Category data file [default: ./data/commands.json]"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: ./memento.toml]"),
        )
        .arg(
            Arg::new("into")
                .short('i')
                .long("into")
                .value_name("FILE")
                .help("HTML file whose <!--app-html--> marker is replaced in place"),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = MementoConfig::load(args)?;
    let data = &config.build_config().data;
    let content =
        ContentModel::read(data).with_context(|| format!("failed to load {data}"))?;
    let labels = config.site.labels();

    match args.get_one::<String>("into") {
        Some(target) => prerender_file(target, content.categories(), &labels)?,
        None => println!("{}", prerender(content.categories(), &labels)?),
    }

    Ok(())
}
