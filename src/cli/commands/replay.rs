//! Replay command implementation.

use anyhow::{Context, Result};
use rotation_backtest::{ReplayConfig, ReplayEngine};
use rotation_config::AppConfig;
use std::path::Path;
use tracing::info;

use super::{checked, load_history};
use crate::cli::{OutputFormat, ReplayArgs};

pub async fn run(
    args: ReplayArgs,
    loaded: Result<AppConfig, config::ConfigError>,
    config_path: &Path,
) -> Result<()> {
    let config = checked(loaded, config_path)?;
    let data = load_history(&config, args.data.as_ref())?;

    let replay_config = ReplayConfig {
        initial_cash: args.cash.unwrap_or(config.account.initial_cash),
        run_at: config.schedule.run_at,
        start: args.start,
        end: args.end,
    };
    info!(
        "Replaying {} instruments from {}",
        config.universe.instruments.len(),
        replay_config.initial_cash
    );

    let engine = ReplayEngine::new(replay_config);
    let report = engine
        .run(
            config.universe.instruments.clone(),
            config.strategy.clone(),
            config.rebalance.clone(),
            data,
        )
        .await
        .context("Replay failed")?;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    if let Some(csv_path) = &args.equity_csv {
        std::fs::write(csv_path, report.equity_to_csv())
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        info!("Equity curve saved to {:?}", csv_path);
    }

    Ok(())
}
