//! Rebalance configuration.

use rotation_core::{error::ConfigError, traits::Validate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Turnover gate and order rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalanceConfig {
    /// Minimum turnover, as a fraction of liquidity, before any order is sent
    pub min_pct_diff: Decimal,
    /// Decimal places kept on target quantities (`None` = unrounded)
    pub quantity_precision: Option<u32>,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            min_pct_diff: dec!(0.1),
            quantity_precision: None,
        }
    }
}

impl Validate for RebalanceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pct_diff.is_sign_negative() && !self.min_pct_diff.is_zero() {
            return Err(ConfigError::NegativeBand(self.min_pct_diff));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_band_rejected() {
        let config = RebalanceConfig {
            min_pct_diff: dec!(-0.01),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NegativeBand(dec!(-0.01)))
        );
        assert!(RebalanceConfig::default().validate().is_ok());
    }
}
