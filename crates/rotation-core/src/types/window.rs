//! Price bars and the bounded per-instrument price window.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Instrument;

/// Which price of a bar feeds the moving averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    /// Closing price
    #[default]
    Close,
    /// Highest price of the session
    High,
}

/// One trading-session sample for an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// End of the session the bar covers
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: Decimal,
    /// Highest price
    pub high: Decimal,
    /// Lowest price
    pub low: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Traded volume
    pub volume: Decimal,
}

impl PriceBar {
    /// Create a new bar.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: Decimal::ZERO,
        }
    }

    /// Create a bar where every price equals `close`.
    pub fn flat(timestamp: DateTime<Utc>, close: Decimal) -> Self {
        Self::new(timestamp, close, close, close, close)
    }

    /// Set the traded volume.
    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    /// Select a price by field.
    #[inline]
    pub fn price(&self, field: PriceField) -> Decimal {
        match field {
            PriceField::Close => self.close,
            PriceField::High => self.high,
        }
    }
}

/// Time-ordered history of bars for one instrument, oldest first.
///
/// An empty window is the normal "insufficient history" state of a newly
/// listed instrument, not an error.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    instrument: Instrument,
    bars: VecDeque<PriceBar>,
}

impl PriceWindow {
    /// Create a new empty window.
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            bars: VecDeque::new(),
        }
    }

    /// Build a window from fetched history, sorting it oldest first.
    pub fn from_bars(instrument: Instrument, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            instrument,
            bars: bars.into(),
        }
    }

    /// The instrument this window belongs to.
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Get the number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get the newest bar.
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.back()
    }

    /// Get an iterator over the bars, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PriceBar> {
        self.bars.iter()
    }

    /// Extract one price per bar.
    pub fn prices(&self, field: PriceField) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.price(field)).collect()
    }

    /// Extract close prices.
    pub fn closes(&self) -> Vec<Decimal> {
        self.prices(PriceField::Close)
    }

    /// Bars strictly newer than `after`, oldest first.
    pub fn newer_than(&self, after: Option<DateTime<Utc>>) -> impl Iterator<Item = &PriceBar> {
        self.bars
            .iter()
            .filter(move |b| after.map_or(true, |t| b.timestamp > t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 21, 0, 0).unwrap()
    }

    #[test]
    fn test_from_bars_sorts_oldest_first() {
        let window = PriceWindow::from_bars(
            Instrument::new("AAPL"),
            vec![
                PriceBar::flat(day(3), dec!(103)),
                PriceBar::flat(day(1), dec!(101)),
                PriceBar::flat(day(2), dec!(102)),
            ],
        );

        assert_eq!(window.closes(), vec![dec!(101), dec!(102), dec!(103)]);
        assert_eq!(window.last().unwrap().timestamp, day(3));
    }

    #[test]
    fn test_price_field_selection() {
        let bar = PriceBar::new(day(1), dec!(100), dec!(110), dec!(95), dec!(105));
        let window = PriceWindow::from_bars(Instrument::new("MSFT"), vec![bar]);

        assert_eq!(window.prices(PriceField::High), vec![dec!(110)]);
        assert_eq!(window.prices(PriceField::Close), vec![dec!(105)]);
    }

    #[test]
    fn test_newer_than() {
        let window = PriceWindow::from_bars(
            Instrument::new("INTC"),
            (1..=5).map(|d| PriceBar::flat(day(d), Decimal::from(d))).collect(),
        );

        assert_eq!(window.newer_than(None).count(), 5);
        assert_eq!(window.newer_than(Some(day(3))).count(), 2);
        assert_eq!(window.newer_than(Some(day(5))).count(), 0);
    }

    #[test]
    fn test_empty_window() {
        let window = PriceWindow::new(Instrument::new("BABA"));
        assert!(window.is_empty());
        assert!(window.last().is_none());
        assert!(window.closes().is_empty());
    }
}
