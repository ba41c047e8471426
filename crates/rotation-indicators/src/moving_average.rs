//! Moving average indicators.

use rotation_core::traits::{Indicator, StreamingIndicator};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Arithmetic mean of all values, `None` when empty. O(n).
pub fn mean(data: &[Decimal]) -> Option<Decimal> {
    if data.is_empty() {
        return None;
    }
    let sum: Decimal = data.iter().sum();
    Some(sum / Decimal::from(data.len()))
}

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values, or of every value
/// when fewer than N are available.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = Decimal;

    fn compute(&self, data: &[Decimal]) -> Option<Decimal> {
        let start = data.len().saturating_sub(self.period);
        mean(&data[start..])
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Streaming SMA over a bounded window, updated one value at a time.
///
/// Until `period` values have been observed the average covers whatever has
/// been seen so far, matching the batch `Sma` on the same input.
#[derive(Debug, Clone)]
pub struct StreamingSma {
    period: usize,
    values: VecDeque<Decimal>,
    sum: Decimal,
}

impl StreamingSma {
    /// Create a new streaming SMA.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: Decimal::ZERO,
        }
    }

    /// Number of values currently inside the window.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing has been observed since the last reset.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl StreamingIndicator for StreamingSma {
    type Output = Decimal;

    fn observe(&mut self, value: Decimal) -> Option<Decimal> {
        if self.values.len() == self.period {
            if let Some(oldest) = self.values.pop_front() {
                self.sum -= oldest;
            }
        }
        self.values.push_back(value);
        self.sum += value;
        self.current()
    }

    fn current(&self) -> Option<Decimal> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / Decimal::from(self.values.len()))
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.sum = Decimal::ZERO;
    }

    fn is_ready(&self) -> bool {
        self.values.len() >= self.period
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StreamingSMA"
    }
}
