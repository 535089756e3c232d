//! Freeze tracker CLI - cumulative freezing and thawing degree days by winter.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "freeze-tracker",
    version,
    about = "Winter freeze and thaw degree-day toolkit"
)]
struct Cli {
    /// Configuration file (defaults to ./freeze-tracker.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: ft_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = ft_cmd::Config::load(cli.config.as_deref())?;
    log::debug!("Using data folder {}", config.data.data_folder.display());
    ft_cmd::run(cli.command, &config).await
}
