//! Rank command implementation.

use anyhow::{Context, Result};
use rotation_broker::PaperBroker;
use rotation_config::AppConfig;
use rotation_engine::CycleOrchestrator;
use std::path::Path;

use super::{checked, load_history};
use crate::cli::{OutputFormat, RankArgs};

pub async fn run(
    args: RankArgs,
    loaded: Result<AppConfig, config::ConfigError>,
    config_path: &Path,
) -> Result<()> {
    let config = checked(loaded, config_path)?;
    let data = load_history(&config, args.data.as_ref())?;

    // Instruments that traded on the date read as open
    let broker = PaperBroker::new(config.account.initial_cash);
    for instrument in &config.universe.instruments {
        if let Some(bar) = data.bar_on(instrument, args.date) {
            broker.mark(instrument, args.date, bar.open)?;
        }
    }

    let orchestrator = CycleOrchestrator::new(
        config.universe.instruments.clone(),
        config.strategy.clone(),
        config.rebalance.clone(),
        data,
        broker,
    )?;
    let now = args.date.and_time(config.schedule.run_at).and_utc();
    let ranked = orchestrator
        .evaluate(now)
        .await
        .context("Ranking failed")?;

    if let OutputFormat::Json = args.output {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
        return Ok(());
    }

    println!("Ranking as of {}", now);
    println!("═══════════════════════════════════════════════════════════════════════");
    println!(
        "  {:>4}  {:<8} {:>12} {:>12} {:>12} {:>8} {:>8}",
        "Rank", "Symbol", "Return", "Short", "Long", "Trend", "Weight"
    );
    println!("  ─────────────────────────────────────────────────────────────────────");

    for entry in &ranked {
        let rank = entry
            .rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        if !entry.state.is_ready {
            println!("  {:>4}  {:<8} {:>12}", rank, entry.instrument.as_str(), "not ready");
            continue;
        }
        println!(
            "  {:>4}  {:<8} {:>12.4} {:>12.4} {:>12.4} {:>8} {:>8.4}",
            rank,
            entry.instrument.as_str(),
            entry.state.trailing_return,
            entry.state.short_average,
            entry.state.long_average,
            if entry.state.is_uptrend() { "up" } else { "down" },
            entry.target_weight,
        );
    }

    let closed: Vec<&str> = config
        .universe
        .instruments
        .iter()
        .filter(|i| ranked.iter().all(|e| &e.instrument != *i))
        .map(|i| i.as_str())
        .collect();
    if !closed.is_empty() {
        println!();
        println!("  No session on {}: {}", args.date, closed.join(", "));
    }

    Ok(())
}
