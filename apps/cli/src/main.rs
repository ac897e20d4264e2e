mod cli;
mod config;
mod main_lib;
mod render;

use clap::Parser;
use cli::Cli;
use config::Config;
use main_lib::{build_services, init_tracing, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    let cli = Cli::parse();

    let services = build_services(&config)?;
    run(cli.command, &config, &services).await
}
