//! Momentum rotation CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use rotation_config::{load_config, AppConfig};
use rotation_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging settings come from the file unless overridden on the command line
    let loaded = load_config(&cli.config);
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_else(|_| AppConfig::default().logging);

    let log_level = match cli.log_level {
        Some(cli::LogLevel::Trace) => "trace",
        Some(cli::LogLevel::Debug) => "debug",
        Some(cli::LogLevel::Info) => "info",
        Some(cli::LogLevel::Warn) => "warn",
        Some(cli::LogLevel::Error) => "error",
        None => logging.level.as_str(),
    };
    let _guard = setup_logging(
        log_level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref(),
    );

    // Execute command
    match cli.command {
        Commands::Replay(args) => cli::commands::replay::run(args, loaded, &cli.config).await,
        Commands::Rank(args) => cli::commands::rank::run(args, loaded, &cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(loaded, &cli.config).await,
    }
}
