//! Strategy configuration.

use chrono::Duration;
use rotation_core::{
    error::ConfigError,
    traits::Validate,
    types::{PriceField, Resolution},
};
use rotation_indicators::ReturnMode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::ranker::SelectionPolicy;

/// How per-instrument averages are maintained between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Averaging {
    /// Recompute everything from the freshly fetched window each cycle
    #[default]
    Recompute,
    /// Keep a `MomentumAccumulator` per instrument, reset when flat
    Streaming,
}

/// Configuration for the momentum rotation strategy.
///
/// Fixed at initialization; there is no runtime mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Number of slots to allocate (TOP_K)
    pub top_k: usize,
    /// Calendar days of history fetched each cycle (HS)
    pub history_span_days: u32,
    /// Samples between the trailing return anchor and the newest sample (WD1)
    pub return_lookback: usize,
    /// Samples in the short average (WD2)
    pub short_window: usize,
    /// Gross exposure multiplier spread over the slots
    pub leverage: Decimal,
    /// Absolute or percentage trailing return
    pub return_mode: ReturnMode,
    /// Price feeding the long and short averages
    pub price_field: PriceField,
    /// What happens to a top slot that fails the trend filter
    pub selection: SelectionPolicy,
    /// Samples required before an instrument is ready
    pub min_samples: usize,
    /// Bar resolution requested from the history source
    pub resolution: Resolution,
    /// Recompute or stream the averages
    pub averaging: Averaging,
    /// Long average window in samples, used only when streaming
    pub long_window_samples: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            history_span_days: 280,
            return_lookback: 61,
            short_window: 25,
            leverage: dec!(1.0),
            return_mode: ReturnMode::Absolute,
            price_field: PriceField::Close,
            selection: SelectionPolicy::HoldCash,
            min_samples: 1,
            resolution: Resolution::Daily,
            averaging: Averaging::Recompute,
            long_window_samples: 193,
        }
    }
}

impl RotationConfig {
    /// History span requested from the data source.
    pub fn history_span(&self) -> Duration {
        Duration::days(i64::from(self.history_span_days))
    }
}

impl Validate for RotationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::ZeroTopK);
        }
        if self.history_span_days == 0 {
            return Err(ConfigError::ZeroWindow {
                name: "history_span_days",
            });
        }
        if self.return_lookback == 0 {
            return Err(ConfigError::ZeroWindow {
                name: "return_lookback",
            });
        }
        if self.short_window == 0 {
            return Err(ConfigError::ZeroWindow {
                name: "short_window",
            });
        }
        if self.long_window_samples == 0 {
            return Err(ConfigError::ZeroWindow {
                name: "long_window_samples",
            });
        }
        if self.short_window > self.history_span_days as usize {
            return Err(ConfigError::ShortWindowExceedsSpan {
                short: self.short_window,
                span: self.history_span_days,
            });
        }
        if self.return_lookback >= self.history_span_days as usize {
            return Err(ConfigError::LookbackExceedsSpan {
                lookback: self.return_lookback,
                span: self.history_span_days,
            });
        }
        if self.leverage.is_sign_negative() && !self.leverage.is_zero() {
            return Err(ConfigError::NegativeLeverage(self.leverage));
        }
        if self.min_samples == 0 {
            return Err(ConfigError::ZeroMinSamples);
        }
        Ok(())
    }
}
