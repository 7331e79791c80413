use anyhow::{Context, Result};
use clap::Parser;
use gpw_analyst::cli::{Cli, Command};
use gpw_analyst::{inspect, logging, snapshot, watch};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose).context("failed to install logger")?;

    match cli.command() {
        Command::Table(args) => snapshot::run(args).await,
        Command::Watch(args) => watch::run(args).await,
        Command::Inspect(args) => inspect::run(args).await,
    }
}
