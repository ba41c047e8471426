//! Turnover-gated rebalancing.

use rotation_core::types::{Instrument, OrderIntent, PortfolioSnapshot};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{RebalanceConfig, TargetLine};

/// Outcome of planning a rebalance.
#[derive(Debug, Clone)]
pub enum RebalanceDecision {
    /// Turnover exceeded the band: every non-zero delta becomes an intent
    Submit {
        intents: Vec<OrderIntent>,
        turnover: Decimal,
        lines: Vec<TargetLine>,
    },
    /// Turnover within the band: nothing is sent
    Suppressed {
        turnover: Decimal,
        lines: Vec<TargetLine>,
    },
    /// Liquidity was zero or negative
    NoLiquidity,
}

impl RebalanceDecision {
    pub fn is_submit(&self) -> bool {
        matches!(self, RebalanceDecision::Submit { .. })
    }

    pub fn intents(&self) -> &[OrderIntent] {
        match self {
            RebalanceDecision::Submit { intents, .. } => intents,
            _ => &[],
        }
    }

    pub fn turnover(&self) -> Option<Decimal> {
        match self {
            RebalanceDecision::Submit { turnover, .. }
            | RebalanceDecision::Suppressed { turnover, .. } => Some(*turnover),
            RebalanceDecision::NoLiquidity => None,
        }
    }

    pub fn lines(&self) -> &[TargetLine] {
        match self {
            RebalanceDecision::Submit { lines, .. }
            | RebalanceDecision::Suppressed { lines, .. } => lines,
            RebalanceDecision::NoLiquidity => &[],
        }
    }
}

/// Converts target weights into order intents.
#[derive(Debug, Clone, Default)]
pub struct Rebalancer {
    config: RebalanceConfig,
}

impl Rebalancer {
    pub fn new(config: RebalanceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RebalanceConfig {
        &self.config
    }

    /// Plan a rebalance of `weights` against `snapshot`.
    ///
    /// Prices and current quantities come from the snapshot. Intents are
    /// emitted all-or-nothing: only when turnover strictly exceeds
    /// `min_pct_diff`.
    pub fn plan(
        &self,
        weights: &[(Instrument, Decimal)],
        snapshot: &PortfolioSnapshot,
    ) -> RebalanceDecision {
        let liquidity = snapshot.liquidity();
        if liquidity <= Decimal::ZERO {
            info!(%liquidity, "No liquidity, skipping rebalance");
            return RebalanceDecision::NoLiquidity;
        }

        let lines: Vec<TargetLine> = weights
            .iter()
            .map(|(instrument, weight)| {
                TargetLine::size(
                    instrument.clone(),
                    *weight,
                    snapshot.price(instrument),
                    snapshot.quantity(instrument),
                    liquidity,
                    self.config.quantity_precision,
                )
            })
            .collect();

        for line in lines.iter().filter(|l| !l.price_valid) {
            debug!(instrument = %line.instrument, price = %line.price, "Invalid price, target frozen");
        }

        let turnover = lines
            .iter()
            .map(TargetLine::traded_value)
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
            .and_then(|traded| traded.checked_div(liquidity))
            .unwrap_or(Decimal::MAX);

        if turnover > self.config.min_pct_diff {
            let intents: Vec<OrderIntent> = lines
                .iter()
                .filter(|l| l.needs_order())
                .map(|l| OrderIntent::new(l.instrument.clone(), l.delta))
                .collect();

            info!(%turnover, orders = intents.len(), "Rebalance approved");
            RebalanceDecision::Submit {
                intents,
                turnover,
                lines,
            }
        } else {
            info!(%turnover, band = %self.config.min_pct_diff, "Rebalance suppressed");
            RebalanceDecision::Suppressed { turnover, lines }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn third() -> Decimal {
        Decimal::ONE / dec!(3)
    }

    #[test]
    fn test_first_allocation() {
        let aapl = Instrument::new("AAPL");
        let snapshot = PortfolioSnapshot::new(dec!(10000)).with_holding(aapl.clone(), Decimal::ZERO, dec!(100));

        let decision = Rebalancer::default().plan(&[(aapl.clone(), third())], &snapshot);

        assert!(decision.is_submit());
        let intents = decision.intents();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].instrument, aapl);
        assert_eq!(intents[0].delta_quantity.round_dp(2), dec!(33.33));

        let turnover = decision.turnover().unwrap();
        assert_eq!(turnover.round_dp(3), dec!(0.333));
        assert!(turnover > dec!(0.1));
    }

    #[test]
    fn test_band_suppresses_everything() {
        let aapl = Instrument::new("AAPL");
        let msft = Instrument::new("MSFT");
        // Target 50 each; small drift of 2 and 3 shares -> turnover 0.05
        let snapshot = PortfolioSnapshot::new(dec!(10000))
            .with_holding(aapl.clone(), dec!(48), dec!(100))
            .with_holding(msft.clone(), dec!(53), dec!(100));

        let decision = Rebalancer::default().plan(
            &[(aapl, dec!(0.5)), (msft, dec!(0.5))],
            &snapshot,
        );

        assert!(matches!(decision, RebalanceDecision::Suppressed { .. }));
        assert!(decision.intents().is_empty());
        assert_eq!(decision.turnover(), Some(dec!(0.05)));
        assert_eq!(decision.lines().len(), 2);
    }

    #[test]
    fn test_all_or_nothing_includes_small_deltas() {
        let aapl = Instrument::new("AAPL");
        let msft = Instrument::new("MSFT");
        let snapshot = PortfolioSnapshot::new(dec!(10000))
            .with_holding(aapl.clone(), dec!(49), dec!(100))
            .with_holding(msft.clone(), Decimal::ZERO, dec!(100));

        let decision = Rebalancer::default().plan(
            &[(aapl, dec!(0.5)), (msft, dec!(0.5))],
            &snapshot,
        );

        // The 1-share AAPL top-up rides along with the MSFT entry.
        assert_eq!(decision.intents().len(), 2);
    }

    #[test]
    fn test_turnover_equal_to_band_is_suppressed() {
        let aapl = Instrument::new("AAPL");
        let snapshot = PortfolioSnapshot::new(dec!(1000)).with_holding(aapl.clone(), Decimal::ZERO, dec!(10));

        let decision = Rebalancer::default().plan(&[(aapl, dec!(0.1))], &snapshot);
        assert!(!decision.is_submit());
        assert_eq!(decision.turnover(), Some(dec!(0.1)));
    }

    #[test]
    fn test_invalid_price_contributes_nothing() {
        let halted = Instrument::new("HALT");
        let aapl = Instrument::new("AAPL");
        let snapshot = PortfolioSnapshot::new(dec!(10000))
            .with_holding(halted.clone(), dec!(5), Decimal::ZERO)
            .with_holding(aapl.clone(), Decimal::ZERO, dec!(100));

        let decision = Rebalancer::default().plan(
            &[(halted.clone(), dec!(0.5)), (aapl.clone(), dec!(0.5))],
            &snapshot,
        );

        assert_eq!(decision.turnover(), Some(dec!(0.5)));
        let intents = decision.intents();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].instrument, aapl);
    }

    #[test]
    fn test_tiny_price_does_not_abort_plan() {
        let penny = Instrument::new("PENNY");
        let aapl = Instrument::new("AAPL");
        let snapshot = PortfolioSnapshot::new(dec!(10000000000))
            .with_holding(penny.clone(), Decimal::ZERO, dec!(0.0000000000000000000001))
            .with_holding(aapl.clone(), Decimal::ZERO, dec!(100));

        let decision = Rebalancer::default().plan(
            &[(penny.clone(), dec!(0.5)), (aapl.clone(), dec!(0.5))],
            &snapshot,
        );

        assert_eq!(decision.turnover(), Some(dec!(0.5)));
        assert!(!decision.lines()[0].price_valid);
        let intents = decision.intents();
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].instrument, aapl);
    }

    #[test]
    fn test_second_plan_after_fill_is_idle() {
        let aapl = Instrument::new("AAPL");
        let rebalancer = Rebalancer::default();
        let weights = [(aapl.clone(), third())];

        let snapshot = PortfolioSnapshot::new(dec!(10000)).with_holding(aapl.clone(), Decimal::ZERO, dec!(100));
        let first = rebalancer.plan(&weights, &snapshot);
        let filled = first.intents()[0].delta_quantity;

        let snapshot = PortfolioSnapshot::new(dec!(10000)).with_holding(aapl.clone(), filled, dec!(100));
        let second = rebalancer.plan(&weights, &snapshot);

        assert!(second.intents().is_empty());
        assert_eq!(second.turnover(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_no_liquidity() {
        let aapl = Instrument::new("AAPL");
        for liquidity in [Decimal::ZERO, dec!(-50)] {
            let snapshot = PortfolioSnapshot::new(liquidity).with_holding(aapl.clone(), Decimal::ZERO, dec!(100));
            let decision = Rebalancer::default().plan(&[(aapl.clone(), dec!(1))], &snapshot);

            assert!(matches!(decision, RebalanceDecision::NoLiquidity));
            assert!(decision.turnover().is_none());
        }
    }

    #[test]
    fn test_zero_weight_liquidates() {
        let aapl = Instrument::new("AAPL");
        let snapshot = PortfolioSnapshot::new(dec!(10000)).with_holding(aapl.clone(), dec!(30), dec!(100));

        let decision = Rebalancer::default().plan(&[(aapl, Decimal::ZERO)], &snapshot);
        let intents = decision.intents();

        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].delta_quantity, dec!(-30));
    }
}
