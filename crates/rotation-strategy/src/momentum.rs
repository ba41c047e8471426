//! Momentum state derived from a price window.
//!
//! `MomentumCalculator` is pure: the same window always gives the same
//! `PriceState`. `MomentumAccumulator` is the incremental variant, an
//! explicit object the caller owns and feeds through `observe`.

use chrono::{DateTime, Utc};
use rotation_core::{
    traits::{Indicator, StreamingIndicator},
    types::{PriceBar, PriceField, PriceWindow},
};
use rotation_indicators::{mean, Sma, StreamingSma, TrailingReturn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::RotationConfig;

/// Per-instrument momentum state for one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceState {
    /// Mean price over the whole window
    pub long_average: Decimal,
    /// Mean price over the most recent `short_window` samples
    pub short_average: Decimal,
    /// Price change over the return lookback
    pub trailing_return: Decimal,
    /// Samples the state was computed from
    pub samples: usize,
    /// Whether enough history exists for the values to be meaningful
    pub is_ready: bool,
}

impl PriceState {
    /// State of an instrument without enough history.
    pub fn not_ready(samples: usize) -> Self {
        Self {
            long_average: Decimal::ZERO,
            short_average: Decimal::ZERO,
            trailing_return: Decimal::ZERO,
            samples,
            is_ready: false,
        }
    }

    /// Short average minus long average.
    pub fn trend(&self) -> Decimal {
        self.short_average - self.long_average
    }

    /// Trend filter: the short average strictly exceeds the long average.
    pub fn is_uptrend(&self) -> bool {
        self.trend() > Decimal::ZERO
    }
}

/// Computes `PriceState` from a freshly fetched window.
#[derive(Debug, Clone)]
pub struct MomentumCalculator {
    short: Sma,
    trailing: TrailingReturn,
    price_field: PriceField,
    min_samples: usize,
}

impl MomentumCalculator {
    /// Create a calculator from the strategy configuration.
    pub fn new(config: &RotationConfig) -> Self {
        Self {
            short: Sma::new(config.short_window.max(1)),
            trailing: TrailingReturn::new(config.return_lookback.max(1), config.return_mode),
            price_field: config.price_field,
            min_samples: config.min_samples.max(1),
        }
    }

    /// Arithmetic mean of every price in the window.
    pub fn long_average(&self, prices: &[Decimal]) -> Option<Decimal> {
        mean(prices)
    }

    /// Mean of the last `short_window` prices, or of all of them when fewer
    /// exist.
    pub fn short_average(&self, prices: &[Decimal]) -> Option<Decimal> {
        self.short.compute(prices)
    }

    /// Close-to-close change over the return lookback.
    pub fn trailing_return(&self, closes: &[Decimal]) -> Option<Decimal> {
        self.trailing.compute(closes)
    }

    /// Evaluate a window.
    pub fn evaluate(&self, window: &PriceWindow) -> PriceState {
        if window.len() < self.min_samples {
            return PriceState::not_ready(window.len());
        }

        let prices = window.prices(self.price_field);
        let closes = window.closes();

        match (
            self.long_average(&prices),
            self.short_average(&prices),
            self.trailing_return(&closes),
        ) {
            (Some(long_average), Some(short_average), Some(trailing_return)) => PriceState {
                long_average,
                short_average,
                trailing_return,
                samples: window.len(),
                is_ready: true,
            },
            _ => PriceState::not_ready(window.len()),
        }
    }
}

/// Streaming momentum state for one instrument.
///
/// Fed bar by bar through `observe`; bars at or before the last observed
/// timestamp are ignored, so the full window can be offered every cycle.
/// The owner resets it when the instrument's position goes flat, after
/// which the next window is absorbed from scratch.
#[derive(Debug, Clone)]
pub struct MomentumAccumulator {
    long: StreamingSma,
    short: StreamingSma,
    closes: VecDeque<Decimal>,
    trailing: TrailingReturn,
    price_field: PriceField,
    min_samples: usize,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MomentumAccumulator {
    /// Create an empty accumulator from the strategy configuration.
    pub fn new(config: &RotationConfig) -> Self {
        let lookback = config.return_lookback.max(1);
        Self {
            long: StreamingSma::new(config.long_window_samples.max(1)),
            short: StreamingSma::new(config.short_window.max(1)),
            closes: VecDeque::with_capacity(lookback + 1),
            trailing: TrailingReturn::new(lookback, config.return_mode),
            price_field: config.price_field,
            min_samples: config.min_samples.max(1),
            last_timestamp: None,
        }
    }

    /// Observe one bar. Returns false when the bar was already seen.
    pub fn observe(&mut self, bar: &PriceBar) -> bool {
        if self.last_timestamp.is_some_and(|t| bar.timestamp <= t) {
            return false;
        }

        let price = bar.price(self.price_field);
        self.long.observe(price);
        self.short.observe(price);

        if self.closes.len() > self.trailing.period() - 1 {
            self.closes.pop_front();
        }
        self.closes.push_back(bar.close);
        self.last_timestamp = Some(bar.timestamp);
        true
    }

    /// Observe every new bar of a window. Returns how many were absorbed.
    pub fn observe_window(&mut self, window: &PriceWindow) -> usize {
        let fresh: Vec<PriceBar> = window.newer_than(self.last_timestamp).cloned().collect();
        fresh.iter().filter(|bar| self.observe(bar)).count()
    }

    /// Forget everything observed so far.
    pub fn reset(&mut self) {
        self.long.reset();
        self.short.reset();
        self.closes.clear();
        self.last_timestamp = None;
    }

    /// Timestamp of the newest observed bar.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }

    /// Current momentum state.
    pub fn state(&self) -> PriceState {
        let samples = self.long.len();
        if samples < self.min_samples {
            return PriceState::not_ready(samples);
        }

        let closes: Vec<Decimal> = self.closes.iter().copied().collect();
        match (
            self.long.current(),
            self.short.current(),
            self.trailing.compute(&closes),
        ) {
            (Some(long_average), Some(short_average), Some(trailing_return)) => PriceState {
                long_average,
                short_average,
                trailing_return,
                samples,
                is_ready: true,
            },
            _ => PriceState::not_ready(samples),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rotation_core::types::Instrument;
    use rotation_indicators::ReturnMode;
    use rust_decimal_macros::dec;

    fn window(prices: &[i64]) -> PriceWindow {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap();
        PriceWindow::from_bars(
            Instrument::new("TEST"),
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PriceBar::flat(start + Duration::days(i as i64), Decimal::from(p)))
                .collect(),
        )
    }

    fn config(short_window: usize, return_lookback: usize) -> RotationConfig {
        RotationConfig {
            history_span_days: 10,
            short_window,
            return_lookback,
            ..Default::default()
        }
    }

    #[test]
    fn test_evaluate_full_window() {
        let calculator = MomentumCalculator::new(&config(2, 3));
        let state = calculator.evaluate(&window(&[10, 20, 30, 40, 50]));

        assert!(state.is_ready);
        assert_eq!(state.long_average, dec!(30));
        assert_eq!(state.short_average, dec!(45));
        assert_eq!(state.trailing_return, dec!(30)); // 50 - 20
        assert!(state.is_uptrend());
    }

    #[test]
    fn test_short_history_uses_available_samples() {
        // HS=10 but only 3 samples available.
        let calculator = MomentumCalculator::new(&config(5, 4));
        let state = calculator.evaluate(&window(&[3, 6, 9]));

        assert!(state.is_ready);
        assert_eq!(state.samples, 3);
        assert_eq!(state.long_average, dec!(6));
        assert_eq!(state.short_average, dec!(6));
        assert_eq!(state.trailing_return, dec!(6)); // anchored at the first sample
        assert!(!state.is_uptrend());
    }

    #[test]
    fn test_min_samples_policy() {
        let calculator = MomentumCalculator::new(&RotationConfig {
            min_samples: 4,
            ..config(2, 3)
        });

        assert!(!calculator.evaluate(&window(&[1, 2, 3])).is_ready);
        assert!(calculator.evaluate(&window(&[1, 2, 3, 4])).is_ready);
    }

    #[test]
    fn test_empty_window_is_not_ready() {
        let calculator = MomentumCalculator::new(&config(2, 3));
        let state = calculator.evaluate(&PriceWindow::new(Instrument::new("NEW")));

        assert_eq!(state, PriceState::not_ready(0));
    }

    #[test]
    fn test_price_field_high_drives_averages() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap();
        let bars = vec![
            PriceBar::new(start, dec!(10), dec!(12), dec!(9), dec!(10)),
            PriceBar::new(start + Duration::days(1), dec!(10), dec!(20), dec!(9), dec!(11)),
        ];
        let window = PriceWindow::from_bars(Instrument::new("TEST"), bars);
        let calculator = MomentumCalculator::new(&RotationConfig {
            price_field: PriceField::High,
            ..config(1, 1)
        });
        let state = calculator.evaluate(&window);

        assert_eq!(state.long_average, dec!(16));
        assert_eq!(state.short_average, dec!(20));
        assert_eq!(state.trailing_return, dec!(1)); // closes
    }

    #[test]
    fn test_percentage_mode() {
        let calculator = MomentumCalculator::new(&RotationConfig {
            return_mode: ReturnMode::Percentage,
            ..config(2, 2)
        });
        let state = calculator.evaluate(&window(&[100, 100, 100, 125]));

        assert_eq!(state.trailing_return, dec!(0.25));
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let calculator = MomentumCalculator::new(&config(3, 2));
        let w = window(&[5, 7, 6, 9, 11, 10]);

        assert_eq!(calculator.evaluate(&w), calculator.evaluate(&w));
    }

    #[test]
    fn test_accumulator_matches_recompute_within_long_window() {
        let cfg = RotationConfig {
            long_window_samples: 100,
            ..config(3, 2)
        };
        let w = window(&[5, 7, 6, 9, 11, 10]);
        let mut accumulator = MomentumAccumulator::new(&cfg);

        assert_eq!(accumulator.observe_window(&w), 6);
        assert_eq!(accumulator.state(), MomentumCalculator::new(&cfg).evaluate(&w));
    }

    #[test]
    fn test_accumulator_skips_seen_bars_and_resets() {
        let cfg = config(2, 1);
        let w = window(&[1, 2, 3]);
        let mut accumulator = MomentumAccumulator::new(&cfg);

        assert_eq!(accumulator.observe_window(&w), 3);
        assert_eq!(accumulator.observe_window(&w), 0);
        assert_eq!(accumulator.state().samples, 3);

        accumulator.reset();
        assert!(accumulator.last_timestamp().is_none());
        assert!(!accumulator.state().is_ready);
        assert_eq!(accumulator.observe_window(&w), 3);
    }
}
