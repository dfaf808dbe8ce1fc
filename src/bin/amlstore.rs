//! AmlStore CLI Binary
//!
//! Command-line interface for browsing AutomationML documents in a BaseX store.

use amlstore::logging::init_logging;
use amlstore::tooling::cli::{Cli, CliContext};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: &Cli, config: &amlstore::config::AmlStoreConfig) -> anyhow::Result<()> {
    let context = CliContext::connect(config)?;
    let output = context.execute(&cli.command).await?;
    if !output.is_empty() {
        println!("{}", output);
    }

    let service = context.service();
    if service.has_error() {
        anyhow::bail!("{}", service.error_message());
    }
    service.shutdown();
    Ok(())
}
