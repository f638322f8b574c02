mod cmd;
mod config;

use anyhow::Result;
use clap::Command;
use std::process::exit;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn cli() -> Command {
    Command::new("memento")
        .about("Build the Git Memento cheat sheet")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd::build::make_subcommand())
        .subcommand(cmd::render::make_subcommand())
        .subcommand(cmd::watch::make_subcommand())
}

#[tokio::main]
async fn main() {
    let layer = fmt::layer().compact().with_writer(std::io::stderr);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(layer).with(filter).init();

    if let Err(error) = run().await {
        error!("{error:?}");
        exit(1);
    }
}

async fn run() -> Result<()> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("build", args)) => cmd::build::execute(args),
        Some(("render", args)) => cmd::render::execute(args),
        Some(("watch", args)) => cmd::watch::execute(args).await,
        _ => unreachable!("subcommand is required"),
    }
}
