//! Replay engine.

use chrono::{NaiveDate, NaiveTime};
use rotation_broker::PaperBroker;
use rotation_core::error::{BrokerError, ConfigError};
use rotation_core::types::Instrument;
use rotation_data::CsvDataSource;
use rotation_engine::{CycleOrchestrator, EngineError};
use rotation_rebalance::RebalanceConfig;
use rotation_strategy::RotationConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::report::ReplayReport;
use crate::statistics::ReplayStats;

/// Replay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Starting cash of the paper account
    pub initial_cash: Decimal,
    /// Time of day the cycle runs
    pub run_at: NaiveTime,
    /// First session replayed (inclusive)
    pub start: Option<NaiveDate>,
    /// Last session replayed (inclusive)
    pub end: Option<NaiveDate>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            initial_cash: dec!(10000),
            run_at: NaiveTime::from_hms_opt(9, 40, 0).unwrap_or(NaiveTime::MIN),
            start: None,
            end: None,
        }
    }
}

/// Errors that stop a replay.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cycle failed on {date}: {source}")]
    Cycle {
        date: NaiveDate,
        #[source]
        source: EngineError,
    },

    #[error("Paper account error: {0}")]
    Broker(#[from] BrokerError),

    #[error("No trading days in the selected range")]
    NoTradingDays,
}

/// Runs the daily schedule over CSV history against a paper account.
pub struct ReplayEngine {
    config: ReplayConfig,
}

impl ReplayEngine {
    /// Create a new replay engine.
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Replay every trading day of `data` within the configured range.
    ///
    /// Each day the account is marked to the open, one cycle runs at
    /// `run_at`, then the account is marked to the close and equity is
    /// recorded.
    pub async fn run(
        &self,
        universe: Vec<Instrument>,
        strategy: RotationConfig,
        rebalance: RebalanceConfig,
        data: CsvDataSource,
    ) -> Result<ReplayReport, ReplayError> {
        let days: Vec<NaiveDate> = data
            .trading_days()
            .into_iter()
            .filter(|d| self.config.start.map_or(true, |s| *d >= s))
            .filter(|d| self.config.end.map_or(true, |e| *d <= e))
            .collect();
        if days.is_empty() {
            return Err(ReplayError::NoTradingDays);
        }

        let broker = PaperBroker::new(self.config.initial_cash);
        let mut orchestrator =
            CycleOrchestrator::new(universe.clone(), strategy, rebalance, data, broker.clone())?;
        let mut stats = ReplayStats::new(self.config.initial_cash);

        info!(
            days = days.len(),
            first = %days[0],
            last = %days[days.len() - 1],
            "Starting replay"
        );

        for date in days {
            for instrument in &universe {
                if let Some(bar) = orchestrator.data().bar_on(instrument, date) {
                    broker.mark(instrument, date, bar.open)?;
                }
            }

            let now = date.and_time(self.config.run_at).and_utc();
            let report = orchestrator
                .run_cycle(now)
                .await
                .map_err(|source| ReplayError::Cycle { date, source })?;
            stats.record_cycle(date, &report);

            for instrument in &universe {
                if let Some(bar) = orchestrator.data().bar_on(instrument, date) {
                    broker.mark(instrument, date, bar.close)?;
                }
            }

            let equity = broker.equity()?;
            debug!(%date, %equity, "Session closed");
            stats.record_equity(date, equity);
        }

        stats.finalize(broker.equity()?);
        info!(
            cycles = stats.cycles,
            rebalances = stats.rebalances,
            orders = stats.orders,
            final_equity = %stats.final_equity,
            "Replay complete"
        );

        Ok(ReplayReport {
            config: self.config.clone(),
            stats,
            final_cash: broker.cash()?,
            final_positions: broker.positions()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rotation_core::types::PriceBar;

    fn history(start_price: i64, step: i64, days: i64) -> Vec<PriceBar> {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..days)
            .map(|i| {
                let close = Decimal::from(start_price + step * i);
                let ts = (first + Duration::days(i))
                    .and_hms_opt(16, 0, 0)
                    .unwrap()
                    .and_utc();
                PriceBar::new(ts, close, close, close, close)
            })
            .collect()
    }

    fn data() -> CsvDataSource {
        let mut data = CsvDataSource::new();
        data.insert(Instrument::new("UP"), history(50, 1, 40));
        data.insert(Instrument::new("DOWN"), history(200, -1, 40));
        data.insert(Instrument::new("FLAT"), history(30, 0, 40));
        data
    }

    fn strategy() -> RotationConfig {
        RotationConfig {
            top_k: 1,
            history_span_days: 20,
            return_lookback: 5,
            short_window: 3,
            ..Default::default()
        }
    }

    fn universe() -> Vec<Instrument> {
        ["UP", "DOWN", "FLAT"].into_iter().map(Instrument::new).collect()
    }

    #[tokio::test]
    async fn test_replay_buys_the_riser_once() {
        let engine = ReplayEngine::new(ReplayConfig::default());
        let report = engine
            .run(universe(), strategy(), RebalanceConfig::default(), data())
            .await
            .unwrap();
        let stats = &report.stats;

        assert_eq!(stats.cycles, 40);
        assert_eq!(stats.equity_curve.len(), 40);
        // Day one has no history. Until four closes exist the short and long
        // averages of UP coincide, so nothing passes the trend filter.
        assert_eq!(stats.cycle_log[0].outcome, "no_ready_instruments");
        assert_eq!(stats.cycle_log[1].outcome, "suppressed");
        assert_eq!(stats.cycle_log[4].outcome, "submitted");
        // Afterwards the fully invested position tracks its target.
        assert_eq!(stats.rebalances, 1);
        assert_eq!(stats.orders, 1);
        assert_eq!(stats.suppressed, 38);
        assert_eq!(report.final_positions.len(), 1);
        assert_eq!(report.final_positions[0].0, Instrument::new("UP"));
        assert!(stats.final_equity > dec!(10000));
    }

    #[tokio::test]
    async fn test_date_range() {
        let config = ReplayConfig {
            start: NaiveDate::from_ymd_opt(2024, 1, 10),
            end: NaiveDate::from_ymd_opt(2024, 1, 19),
            ..Default::default()
        };
        let report = ReplayEngine::new(config)
            .run(universe(), strategy(), RebalanceConfig::default(), data())
            .await
            .unwrap();

        assert_eq!(report.stats.cycles, 10);
        assert_eq!(report.stats.cycle_log[0].outcome, "submitted");
    }

    #[tokio::test]
    async fn test_empty_range() {
        let config = ReplayConfig {
            start: Some(Utc::now().date_naive() + Duration::days(365)),
            ..Default::default()
        };
        let result = ReplayEngine::new(config)
            .run(universe(), strategy(), RebalanceConfig::default(), data())
            .await;

        assert!(matches!(result, Err(ReplayError::NoTradingDays)));
    }
}
