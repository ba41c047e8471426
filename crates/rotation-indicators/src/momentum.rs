//! Trailing return (momentum) indicator.

use rotation_core::traits::Indicator;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Smallest divisor used for percentage returns.
///
/// An anchor price at or below this value is clamped to it, so a zero or
/// near-zero anchor yields a large finite return instead of a division by
/// zero.
pub const RETURN_EPSILON: Decimal = dec!(0.00000001);

/// How the trailing price change is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    /// `p[last] - p[anchor]`
    #[default]
    Absolute,
    /// `(p[last] - p[anchor]) / p[anchor]`
    Percentage,
}

/// Price change over a fixed lookback ending at the newest sample.
///
/// When the series is shorter than the lookback, the anchor is the oldest
/// available sample (an asymmetric lookback rather than a failure).
#[derive(Debug, Clone)]
pub struct TrailingReturn {
    lookback: usize,
    mode: ReturnMode,
}

impl TrailingReturn {
    /// Create a new trailing return indicator.
    pub fn new(lookback: usize, mode: ReturnMode) -> Self {
        assert!(lookback > 0, "Lookback must be greater than 0");
        Self { lookback, mode }
    }

    /// The configured return mode.
    pub fn mode(&self) -> ReturnMode {
        self.mode
    }

    /// Index of the anchor sample for a series of `len` samples.
    #[inline]
    pub fn anchor_index(&self, len: usize) -> usize {
        len.saturating_sub(1).saturating_sub(self.lookback)
    }
}

impl Indicator for TrailingReturn {
    type Output = Decimal;

    fn compute(&self, data: &[Decimal]) -> Option<Decimal> {
        let last = *data.last()?;
        let anchor = data[self.anchor_index(data.len())];
        let change = last - anchor;

        match self.mode {
            ReturnMode::Absolute => Some(change),
            ReturnMode::Percentage => {
                let divisor = if anchor <= RETURN_EPSILON {
                    RETURN_EPSILON
                } else {
                    anchor
                };
                Some(change.checked_div(divisor).unwrap_or(if change.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }))
            }
        }
    }

    fn period(&self) -> usize {
        self.lookback + 1
    }

    fn name(&self) -> &str {
        "TrailingReturn"
    }
}
