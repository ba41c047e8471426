//! Error types for the rotation engine.
//!
//! Per-instrument data anomalies (short history, invalid prices, an empty
//! rank set) are not errors: they are absorbed where they occur. Only
//! configuration errors are fatal, and only collaborator failures are
//! surfaced at runtime.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Instrument, Resolution};

/// Setup-time configuration errors. Rejected before the first cycle runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("top_k must be greater than 0")]
    ZeroTopK,

    #[error("{name} must be greater than 0")]
    ZeroWindow { name: &'static str },

    #[error("short window ({short}) exceeds the history span ({span} days)")]
    ShortWindowExceedsSpan { short: usize, span: u32 },

    #[error("return lookback ({lookback}) must be shorter than the history span ({span} days)")]
    LookbackExceedsSpan { lookback: usize, span: u32 },

    #[error("leverage must be non-negative, got {0}")]
    NegativeLeverage(Decimal),

    #[error("min_pct_diff must be non-negative, got {0}")]
    NegativeBand(Decimal),

    #[error("min_samples must be at least 1")]
    ZeroMinSamples,

    #[error("instrument universe is empty")]
    EmptyUniverse,

    #[error("instrument registered twice: {0}")]
    DuplicateInstrument(Instrument),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// History source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unknown instrument: {0}")]
    UnknownInstrument(Instrument),

    #[error("Unsupported resolution: {0}")]
    UnsupportedResolution(Resolution),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Broker (account, quote and order routing) errors.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Broker error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(ConfigError::ZeroTopK.to_string(), "top_k must be greater than 0");
        assert_eq!(
            ConfigError::NegativeLeverage(dec!(-1)).to_string(),
            "leverage must be non-negative, got -1"
        );
        assert_eq!(
            ConfigError::DuplicateInstrument(Instrument::new("AAPL")).to_string(),
            "instrument registered twice: AAPL"
        );
    }
}
