//! gbdate CLI - Main entry point

use clap::Parser;
use gbdate_cli::{commands, Cli, CliError, Commands, Config};
use gbdate_common::logging::{init_logging, LogConfig, LogLevel};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let base = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        })
        .log_file_prefix("gbdate")
        .build();

    // Environment variables take precedence over flags
    let log_config = base.clone().merge_env().unwrap_or(base);

    let guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", CliError::from(e));
            process::exit(1);
        },
    };

    let result = execute_command(&cli).await;

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        drop(guard);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> gbdate_cli::Result<()> {
    match &cli.command {
        Commands::Fetch(args) => {
            let config = args.entrez.apply(Config::from_env()?);
            commands::fetch::run(args, config).await
        },

        Commands::Extract { input, output } => commands::extract::run(input, output).await,
    }
}
