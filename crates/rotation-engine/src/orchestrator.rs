//! One rebalancing cycle, end to end.

use chrono::{DateTime, Utc};
use rotation_core::error::{BrokerError, ConfigError};
use rotation_core::traits::{Broker, DataSource, Validate};
use rotation_core::types::{Holding, Instrument, OrderIntent, PortfolioSnapshot, PriceWindow};
use rotation_rebalance::{RebalanceConfig, RebalanceDecision, Rebalancer, TargetLine};
use rotation_strategy::{
    Averaging, MomentumAccumulator, MomentumCalculator, PriceState, RankEntry, Ranker,
    RotationConfig, WeightAssigner,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, error, info, warn};

use crate::EngineError;

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// No open instrument had enough history
    NoReadyInstruments,
    /// Account liquidity was zero or negative
    NoLiquidity,
    /// Turnover did not clear the band
    Suppressed { turnover: Decimal },
    /// Every intent was submitted
    Submitted {
        turnover: Decimal,
        intents: Vec<OrderIntent>,
    },
}

/// What a cycle saw and decided.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub at: DateTime<Utc>,
    /// Open instruments, ranked (registration order when nothing was ready)
    pub entries: Vec<RankEntry>,
    /// Sizing of each weighted instrument
    pub lines: Vec<TargetLine>,
    /// Instruments whose market was closed
    pub skipped: Vec<Instrument>,
    /// Open instruments without enough history
    pub not_ready: Vec<Instrument>,
    pub outcome: CycleOutcome,
}

impl CycleReport {
    /// Orders sent this cycle.
    pub fn intents(&self) -> &[OrderIntent] {
        match &self.outcome {
            CycleOutcome::Submitted { intents, .. } => intents,
            _ => &[],
        }
    }

    /// Turnover, when it was computed.
    pub fn turnover(&self) -> Option<Decimal> {
        match &self.outcome {
            CycleOutcome::Submitted { turnover, .. } | CycleOutcome::Suppressed { turnover } => {
                Some(*turnover)
            }
            _ => None,
        }
    }

    /// `(instrument, weight)` for every ranked entry.
    pub fn weights(&self) -> Vec<(Instrument, Decimal)> {
        WeightAssigner::weights(&self.entries)
    }
}

/// Runs rebalancing cycles over a fixed universe.
///
/// Cycles are exclusive through `&mut self`; every collaborator call is
/// awaited in turn.
pub struct CycleOrchestrator<D, B> {
    universe: Vec<Instrument>,
    config: RotationConfig,
    calculator: MomentumCalculator,
    ranker: Ranker,
    assigner: WeightAssigner,
    rebalancer: Rebalancer,
    accumulators: Vec<MomentumAccumulator>,
    data: D,
    broker: B,
}

impl<D: DataSource, B: Broker> CycleOrchestrator<D, B> {
    /// Validate the configuration and register the universe, in order.
    pub fn new(
        universe: Vec<Instrument>,
        config: RotationConfig,
        rebalance: RebalanceConfig,
        data: D,
        broker: B,
    ) -> Result<Self, ConfigError> {
        if universe.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        let mut seen = HashSet::new();
        for instrument in &universe {
            if !seen.insert(instrument) {
                return Err(ConfigError::DuplicateInstrument(instrument.clone()));
            }
        }
        config.validate()?;
        rebalance.validate()?;

        let accumulators = universe
            .iter()
            .map(|_| MomentumAccumulator::new(&config))
            .collect();

        info!(
            instruments = universe.len(),
            top_k = config.top_k,
            data = data.name(),
            broker = broker.name(),
            "Orchestrator ready"
        );

        Ok(Self {
            calculator: MomentumCalculator::new(&config),
            ranker: Ranker::new(config.top_k, config.selection),
            assigner: WeightAssigner::new(config.top_k, config.leverage),
            rebalancer: Rebalancer::new(rebalance),
            accumulators,
            universe,
            config,
            data,
            broker,
        })
    }

    pub fn universe(&self) -> &[Instrument] {
        &self.universe
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Run one cycle as of `now`.
    pub async fn run_cycle(&mut self, now: DateTime<Utc>) -> Result<CycleReport, EngineError> {
        let mut entries = Vec::with_capacity(self.universe.len());
        let mut skipped = Vec::new();

        for idx in 0..self.universe.len() {
            let instrument = self.universe[idx].clone();

            if !self.broker.is_market_open(&instrument, now).await? {
                debug!(%instrument, "Market closed, skipping");
                skipped.push(instrument);
                continue;
            }

            let canceled = self.broker.cancel_open_orders(&instrument).await?;
            if canceled > 0 {
                info!(%instrument, canceled, "Canceled stale orders");
            }

            let window = self.window(&instrument, now).await;
            let state = match self.config.averaging {
                Averaging::Recompute => self.calculator.evaluate(&window),
                Averaging::Streaming => {
                    let held = self.broker.current_holdings(&instrument).await?;
                    let accumulator = &mut self.accumulators[idx];
                    if held.is_zero() {
                        accumulator.reset();
                    }
                    accumulator.observe_window(&window);
                    accumulator.state()
                }
            };
            log_state(&instrument, &state);

            entries.push(RankEntry::new(instrument, state));
        }

        let not_ready: Vec<Instrument> = entries
            .iter()
            .filter(|e| !e.state.is_ready)
            .map(|e| e.instrument.clone())
            .collect();

        if entries.iter().all(|e| !e.state.is_ready) {
            info!(skipped = skipped.len(), "No ready instruments, nothing to rank");
            return Ok(CycleReport {
                at: now,
                entries,
                lines: Vec::new(),
                skipped,
                not_ready,
                outcome: CycleOutcome::NoReadyInstruments,
            });
        }

        let mut ranked = self.ranker.rank(entries);
        self.assigner.assign(&mut ranked);
        let weights = WeightAssigner::weights(&ranked);

        let snapshot = self.snapshot(&weights).await?;
        let decision = self.rebalancer.plan(&weights, &snapshot);
        let lines = decision.lines().to_vec();

        let outcome = match decision {
            RebalanceDecision::NoLiquidity => CycleOutcome::NoLiquidity,
            RebalanceDecision::Suppressed { turnover, .. } => CycleOutcome::Suppressed { turnover },
            RebalanceDecision::Submit {
                intents, turnover, ..
            } => {
                let mut submitted = 0;
                for intent in &intents {
                    if let Err(source) = self.broker.submit_order(intent).await {
                        error!(%intent, submitted, error = %source, "Order submission failed");
                        return Err(EngineError::Submission { submitted, source });
                    }
                    submitted += 1;
                }
                CycleOutcome::Submitted { turnover, intents }
            }
        };

        Ok(CycleReport {
            at: now,
            entries: ranked,
            lines,
            skipped,
            not_ready,
            outcome,
        })
    }

    /// Rank and weight the open instruments as of `now` without touching
    /// orders or streaming state.
    pub async fn evaluate(&self, now: DateTime<Utc>) -> Result<Vec<RankEntry>, EngineError> {
        let mut entries = Vec::with_capacity(self.universe.len());

        for instrument in &self.universe {
            if !self.broker.is_market_open(instrument, now).await? {
                continue;
            }
            let window = self.window(instrument, now).await;
            let state = self.calculator.evaluate(&window);
            log_state(instrument, &state);
            entries.push(RankEntry::new(instrument.clone(), state));
        }

        let mut ranked = self.ranker.rank(entries);
        self.assigner.assign(&mut ranked);
        Ok(ranked)
    }

    /// Fetch the history window; a failed fetch reads as no history.
    async fn window(&self, instrument: &Instrument, now: DateTime<Utc>) -> PriceWindow {
        match self
            .data
            .fetch_history(
                instrument,
                now,
                self.config.history_span(),
                self.config.resolution,
            )
            .await
        {
            Ok(bars) => PriceWindow::from_bars(instrument.clone(), bars),
            Err(e) => {
                warn!(%instrument, error = %e, "History fetch failed, treating as not ready");
                PriceWindow::new(instrument.clone())
            }
        }
    }

    async fn snapshot(
        &self,
        weights: &[(Instrument, Decimal)],
    ) -> Result<PortfolioSnapshot, BrokerError> {
        let mut snapshot = PortfolioSnapshot::new(self.broker.total_liquidity().await?);
        for (instrument, _) in weights {
            let price = self.broker.current_price(instrument).await?;
            let quantity = self.broker.current_holdings(instrument).await?;
            snapshot.push(Holding::new(instrument.clone(), quantity, price));
        }
        Ok(snapshot)
    }
}

fn log_state(instrument: &Instrument, state: &PriceState) {
    debug!(
        %instrument,
        ready = state.is_ready,
        samples = state.samples,
        long = %state.long_average,
        short = %state.short_average,
        trailing_return = %state.trailing_return,
        "Price state"
    );
}
