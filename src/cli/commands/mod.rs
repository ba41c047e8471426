//! CLI command implementations.

pub mod rank;
pub mod replay;
pub mod validate;

use anyhow::{Context, Result};
use rotation_config::AppConfig;
use rotation_core::traits::Validate;
use rotation_data::CsvDataSource;
use std::path::{Path, PathBuf};
use tracing::info;

/// Unwrap a loaded configuration and validate it.
fn checked(loaded: Result<AppConfig, config::ConfigError>, path: &Path) -> Result<AppConfig> {
    let config = loaded.with_context(|| format!("Failed to load {}", path.display()))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Load the universe's history from `dir` (or `data.dir`).
fn load_history(config: &AppConfig, dir: Option<&PathBuf>) -> Result<CsvDataSource> {
    let dir = dir.unwrap_or(&config.data.dir);
    if !dir.is_dir() {
        anyhow::bail!(
            "Data directory '{}' does not exist. Provide a directory of {{instrument}}.csv files (e.g. --data ./data)",
            dir.display()
        );
    }

    let source = CsvDataSource::new()
        .with_session_close(config.data.session_close)
        .load_dir(dir, &config.universe.instruments)
        .with_context(|| format!("Failed to read history from {}", dir.display()))?;

    let loaded = source.instruments().count();
    if loaded == 0 {
        anyhow::bail!("No history files found in {}", dir.display());
    }
    info!("Loaded history for {} of {} instruments", loaded, config.universe.instruments.len());
    Ok(source)
}
