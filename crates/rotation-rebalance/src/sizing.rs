//! Per-instrument target sizing.

use rotation_core::types::Instrument;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Target computation for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetLine {
    pub instrument: Instrument,
    pub weight: Decimal,
    pub price: Decimal,
    pub current_quantity: Decimal,
    pub target_quantity: Decimal,
    /// `target_quantity - current_quantity`
    pub delta: Decimal,
    /// False when the price was not positive or the sizing overflowed, and
    /// the target was frozen
    pub price_valid: bool,
}

impl TargetLine {
    /// Size one instrument.
    ///
    /// A non-positive price, or one so small that the target or its traded
    /// value overflows, freezes the target at the current quantity.
    pub fn size(
        instrument: Instrument,
        weight: Decimal,
        price: Decimal,
        current_quantity: Decimal,
        liquidity: Decimal,
        precision: Option<u32>,
    ) -> Self {
        let sized = if price > Decimal::ZERO {
            Self::checked_target(weight, price, current_quantity, liquidity, precision)
        } else {
            None
        };
        let price_valid = sized.is_some();
        let target_quantity = sized.unwrap_or(current_quantity);

        Self {
            instrument,
            weight,
            price,
            current_quantity,
            target_quantity,
            delta: target_quantity - current_quantity,
            price_valid,
        }
    }

    /// `liquidity * weight / price`, or `None` when the target or its traded
    /// value is out of `Decimal` range.
    fn checked_target(
        weight: Decimal,
        price: Decimal,
        current_quantity: Decimal,
        liquidity: Decimal,
        precision: Option<u32>,
    ) -> Option<Decimal> {
        let raw = liquidity.checked_mul(weight)?.checked_div(price)?;
        let target = match precision {
            Some(dp) => raw.round_dp_with_strategy(dp, RoundingStrategy::ToZero),
            None => raw,
        };
        target
            .checked_sub(current_quantity)?
            .checked_mul(price)?;
        Some(target)
    }

    /// Traded notional `|delta * price|`, zero for an invalid price.
    pub fn traded_value(&self) -> Decimal {
        if !self.price_valid {
            return Decimal::ZERO;
        }
        self.delta
            .checked_mul(self.price)
            .map(|v| v.abs())
            .unwrap_or(Decimal::ZERO)
    }

    /// Check if the line requires an order.
    pub fn needs_order(&self) -> bool {
        !self.delta.is_zero()
    }
}
