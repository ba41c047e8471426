//! Order intents emitted by the rebalancer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Instrument;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A signed quantity change for one instrument.
///
/// This is the only artifact a cycle produces; it is handed to the
/// execution collaborator as a market order for `delta_quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Instrument to trade
    pub instrument: Instrument,
    /// Positive to buy, negative to sell
    pub delta_quantity: Decimal,
}

impl OrderIntent {
    /// Create a new intent.
    pub fn new(instrument: Instrument, delta_quantity: Decimal) -> Self {
        Self {
            instrument,
            delta_quantity,
        }
    }

    /// Side implied by the sign of the delta. A zero delta reads as a buy.
    pub fn side(&self) -> Side {
        if self.delta_quantity.is_sign_negative() && !self.delta_quantity.is_zero() {
            Side::Sell
        } else {
            Side::Buy
        }
    }

    /// Unsigned quantity to trade.
    pub fn abs_quantity(&self) -> Decimal {
        self.delta_quantity.abs()
    }
}

impl fmt::Display for OrderIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.side(), self.abs_quantity(), self.instrument)
    }
}
