//! Replay statistics.

use chrono::NaiveDate;
use rotation_engine::{CycleOutcome, CycleReport};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Summary of one replayed cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub date: NaiveDate,
    /// `submitted`, `suppressed`, `no_ready_instruments` or `no_liquidity`
    pub outcome: String,
    pub turnover: Option<Decimal>,
    pub orders: usize,
    pub skipped: usize,
    pub not_ready: usize,
}

/// Replay statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayStats {
    /// Starting cash
    pub initial_cash: Decimal,
    /// Equity after the last session
    pub final_equity: Decimal,
    /// Total return percentage
    pub total_return_pct: Decimal,
    /// Maximum drawdown percentage
    pub max_drawdown_pct: Decimal,
    /// Sharpe ratio of daily returns (risk-free rate of 0)
    pub sharpe_ratio: f64,
    /// Cycles run
    pub cycles: usize,
    /// Cycles whose orders were submitted
    pub rebalances: usize,
    /// Cycles held back by the turnover band
    pub suppressed: usize,
    /// Cycles with nothing ready or no liquidity
    pub idle: usize,
    /// Orders submitted
    pub orders: usize,
    /// Equity at each session close
    pub equity_curve: Vec<(NaiveDate, Decimal)>,
    /// Per-cycle log
    pub cycle_log: Vec<CycleRecord>,
    peak_equity: Decimal,
    daily_returns: Vec<f64>,
}

impl ReplayStats {
    /// Create new stats tracker.
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            initial_cash,
            final_equity: initial_cash,
            total_return_pct: Decimal::ZERO,
            max_drawdown_pct: Decimal::ZERO,
            sharpe_ratio: 0.0,
            cycles: 0,
            rebalances: 0,
            suppressed: 0,
            idle: 0,
            orders: 0,
            equity_curve: Vec::new(),
            cycle_log: Vec::new(),
            peak_equity: initial_cash,
            daily_returns: Vec::new(),
        }
    }

    /// Count a cycle's outcome.
    pub fn record_cycle(&mut self, date: NaiveDate, report: &CycleReport) {
        self.cycles += 1;
        let outcome = match &report.outcome {
            CycleOutcome::Submitted { intents, .. } => {
                self.rebalances += 1;
                self.orders += intents.len();
                "submitted"
            }
            CycleOutcome::Suppressed { .. } => {
                self.suppressed += 1;
                "suppressed"
            }
            CycleOutcome::NoReadyInstruments => {
                self.idle += 1;
                "no_ready_instruments"
            }
            CycleOutcome::NoLiquidity => {
                self.idle += 1;
                "no_liquidity"
            }
        };

        self.cycle_log.push(CycleRecord {
            date,
            outcome: outcome.to_string(),
            turnover: report.turnover(),
            orders: report.intents().len(),
            skipped: report.skipped.len(),
            not_ready: report.not_ready.len(),
        });
    }

    /// Record equity at a session close.
    pub fn record_equity(&mut self, date: NaiveDate, equity: Decimal) {
        if let Some((_, prev_equity)) = self.equity_curve.last() {
            if *prev_equity > Decimal::ZERO {
                let ret = ((equity - *prev_equity) / *prev_equity)
                    .to_f64()
                    .unwrap_or(0.0);
                self.daily_returns.push(ret);
            }
        }

        self.equity_curve.push((date, equity));

        if equity > self.peak_equity {
            self.peak_equity = equity;
        }

        if self.peak_equity > Decimal::ZERO {
            let drawdown = (self.peak_equity - equity) / self.peak_equity * dec!(100);
            if drawdown > self.max_drawdown_pct {
                self.max_drawdown_pct = drawdown;
            }
        }
    }

    /// Calculate final statistics.
    pub fn finalize(&mut self, final_equity: Decimal) {
        self.final_equity = final_equity;

        if self.initial_cash > Decimal::ZERO {
            self.total_return_pct =
                (self.final_equity - self.initial_cash) / self.initial_cash * dec!(100);
        }

        if !self.daily_returns.is_empty() {
            let n = self.daily_returns.len() as f64;
            let mean: f64 = self.daily_returns.iter().sum::<f64>() / n;
            let variance: f64 = self
                .daily_returns
                .iter()
                .map(|r| (r - mean).powi(2))
                .sum::<f64>()
                / n;
            let std_dev = variance.sqrt();

            if std_dev > 0.0 {
                self.sharpe_ratio = (mean * 252.0_f64.sqrt()) / std_dev;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    #[test]
    fn test_drawdown_and_return() {
        let mut stats = ReplayStats::new(dec!(10000));
        stats.record_equity(day(1), dec!(10000));
        stats.record_equity(day(2), dec!(12000));
        stats.record_equity(day(5), dec!(9000));
        stats.record_equity(day(6), dec!(11000));
        stats.finalize(dec!(11000));

        assert_eq!(stats.max_drawdown_pct, dec!(25));
        assert_eq!(stats.total_return_pct, dec!(10));
        assert_eq!(stats.equity_curve.len(), 4);
        assert!(stats.sharpe_ratio != 0.0);
    }

    #[test]
    fn test_flat_equity_has_zero_sharpe() {
        let mut stats = ReplayStats::new(dec!(500));
        stats.record_equity(day(1), dec!(500));
        stats.record_equity(day(2), dec!(500));
        stats.finalize(dec!(500));

        assert_eq!(stats.sharpe_ratio, 0.0);
        assert_eq!(stats.max_drawdown_pct, Decimal::ZERO);
    }
}
