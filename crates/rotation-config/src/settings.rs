//! Configuration structures.

use chrono::NaiveTime;
use rotation_core::{error::ConfigError, traits::Validate, types::Instrument};
use rotation_rebalance::RebalanceConfig;
use rotation_strategy::RotationConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub strategy: RotationConfig,
    #[serde(default)]
    pub rebalance: RebalanceConfig,
    #[serde(default)]
    pub universe: UniverseSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub account: AccountSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;
        self.rebalance.validate()?;
        self.universe.validate()?;
        self.account.validate()?;
        self.logging.validate()?;
        if self.strategy.resolution.is_intraday() {
            return Err(ConfigError::Invalid(format!(
                "CSV history holds daily bars, resolution {} is not available",
                self.strategy.resolution
            )));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "rotation".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Daily-rolling log file
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.format.to_ascii_lowercase().as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!(
                "logging.format must be pretty or json, got {other}"
            ))),
        }
    }
}

/// Ordered instrument universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseSettings {
    pub instruments: Vec<Instrument>,
}

impl Default for UniverseSettings {
    fn default() -> Self {
        Self {
            instruments: ["AAPL", "MSFT", "INTC", "AMZN", "GOOGL", "FB", "BABA"]
                .into_iter()
                .map(Instrument::new)
                .collect(),
        }
    }
}

impl Validate for UniverseSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if !seen.insert(instrument) {
                return Err(ConfigError::DuplicateInstrument(instrument.clone()));
            }
        }
        Ok(())
    }
}

/// Daily schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Time of day the cycle runs
    pub run_at: NaiveTime,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            run_at: NaiveTime::from_hms_opt(9, 40, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Paper account settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountSettings {
    pub initial_cash: Decimal,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            initial_cash: dec!(10000),
        }
    }
}

impl Validate for AccountSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_cash < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "account.initial_cash must be non-negative, got {}",
                self.initial_cash
            )));
        }
        Ok(())
    }
}

/// History data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding `{instrument}.csv` files
    pub dir: PathBuf,
    /// Time date-only rows are stamped at
    pub session_close: NaiveTime,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            session_close: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}
