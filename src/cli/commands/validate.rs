//! Validate configuration command.

use anyhow::Result;
use rotation_config::AppConfig;
use rotation_core::traits::Validate;
use std::path::Path;

pub async fn run(loaded: Result<AppConfig, config::ConfigError>, config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    let universe: Vec<&str> = config
        .universe
        .instruments
        .iter()
        .map(|i| i.as_str())
        .collect();

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Universe: {}", universe.join(", "));
    println!("Top K: {}", config.strategy.top_k);
    println!("History span: {} days", config.strategy.history_span_days);
    println!("Return lookback: {}", config.strategy.return_lookback);
    println!("Short window: {}", config.strategy.short_window);
    println!("Leverage: {}", config.strategy.leverage);
    println!("Rebalance band: {}", config.rebalance.min_pct_diff);
    println!("Run at: {}", config.schedule.run_at);
    println!("Initial cash: ${}", config.account.initial_cash);

    Ok(())
}
