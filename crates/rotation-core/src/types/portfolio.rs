//! Read-only portfolio snapshot consumed by the rebalancer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Instrument;

/// Current holding and price of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Instrument held
    pub instrument: Instrument,
    /// Number of units (positive for long, negative for short)
    pub quantity: Decimal,
    /// Current market price
    pub price: Decimal,
}

impl Holding {
    /// Create a new holding.
    pub fn new(instrument: Instrument, quantity: Decimal, price: Decimal) -> Self {
        Self {
            instrument,
            quantity,
            price,
        }
    }
}

/// Holdings, prices and total liquidity at the time of a cycle.
///
/// Liquidity is cash plus the mark-to-market value of all holdings, as
/// reported by the account. The core never mutates a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    holdings: Vec<Holding>,
    liquidity: Decimal,
}

impl PortfolioSnapshot {
    /// Create an empty snapshot with the given liquidity.
    pub fn new(liquidity: Decimal) -> Self {
        Self {
            holdings: Vec::new(),
            liquidity,
        }
    }

    /// Add a holding (builder style).
    pub fn with_holding(mut self, instrument: Instrument, quantity: Decimal, price: Decimal) -> Self {
        self.push(Holding::new(instrument, quantity, price));
        self
    }

    /// Add or replace a holding.
    pub fn push(&mut self, holding: Holding) {
        match self
            .holdings
            .iter_mut()
            .find(|h| h.instrument == holding.instrument)
        {
            Some(existing) => *existing = holding,
            None => self.holdings.push(holding),
        }
    }

    /// Get a holding by instrument.
    pub fn holding(&self, instrument: &Instrument) -> Option<&Holding> {
        self.holdings.iter().find(|h| &h.instrument == instrument)
    }

    /// Held quantity, zero when the instrument is not held.
    pub fn quantity(&self, instrument: &Instrument) -> Decimal {
        self.holding(instrument)
            .map(|h| h.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// Current price, zero when unknown.
    pub fn price(&self, instrument: &Instrument) -> Decimal {
        self.holding(instrument)
            .map(|h| h.price)
            .unwrap_or(Decimal::ZERO)
    }

    /// Total liquidity (cash + holdings value).
    pub fn liquidity(&self) -> Decimal {
        self.liquidity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_lookup() {
        let snapshot = PortfolioSnapshot::new(dec!(10000))
            .with_holding(Instrument::new("AAPL"), dec!(10), dec!(150))
            .with_holding(Instrument::new("MSFT"), dec!(0), dec!(300));

        assert_eq!(snapshot.quantity(&Instrument::new("AAPL")), dec!(10));
        assert_eq!(snapshot.price(&Instrument::new("MSFT")), dec!(300));
        assert_eq!(snapshot.quantity(&Instrument::new("INTC")), Decimal::ZERO);
        assert!(snapshot.holding(&Instrument::new("NVDA")).is_none());
    }

    #[test]
    fn test_push_replaces_existing() {
        let mut snapshot = PortfolioSnapshot::new(dec!(1000));
        snapshot.push(Holding::new(Instrument::new("AAPL"), dec!(1), dec!(100)));
        snapshot.push(Holding::new(Instrument::new("AAPL"), dec!(2), dec!(101)));

        assert_eq!(snapshot.price(&Instrument::new("AAPL")), dec!(101));
        assert_eq!(snapshot.quantity(&Instrument::new("AAPL")), dec!(2));
    }
}
