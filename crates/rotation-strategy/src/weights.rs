//! Equal-slot weight assignment.

use rotation_core::types::Instrument;
use rust_decimal::Decimal;

use crate::RankEntry;

/// Gives each selected entry `leverage / top_k` and every other entry zero.
#[derive(Debug, Clone)]
pub struct WeightAssigner {
    top_k: usize,
    leverage: Decimal,
}

impl WeightAssigner {
    pub fn new(top_k: usize, leverage: Decimal) -> Self {
        Self { top_k, leverage }
    }

    /// Weight of one selected slot.
    pub fn slot_weight(&self) -> Decimal {
        if self.top_k == 0 {
            return Decimal::ZERO;
        }
        self.leverage / Decimal::from(self.top_k)
    }

    /// Set `target_weight` on every entry.
    pub fn assign(&self, entries: &mut [RankEntry]) {
        let slot = self.slot_weight();
        let mut filled = 0;

        for entry in entries.iter_mut() {
            entry.target_weight = if entry.selected && filled < self.top_k {
                filled += 1;
                slot
            } else {
                Decimal::ZERO
            };
        }
    }

    /// `(instrument, weight)` pairs in entry order.
    pub fn weights(entries: &[RankEntry]) -> Vec<(Instrument, Decimal)> {
        entries
            .iter()
            .map(|e| (e.instrument.clone(), e.target_weight))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PriceState, Ranker, SelectionPolicy};
    use rust_decimal_macros::dec;

    fn entry(name: &str, trailing_return: Decimal, uptrend: bool) -> RankEntry {
        RankEntry::new(
            Instrument::new(name),
            PriceState {
                long_average: dec!(50),
                short_average: if uptrend { dec!(55) } else { dec!(45) },
                trailing_return,
                samples: 30,
                is_ready: true,
            },
        )
    }

    fn universe() -> Vec<RankEntry> {
        vec![
            entry("AAPL", dec!(12), true),
            entry("MSFT", dec!(11), true),
            entry("INTC", dec!(10), false),
            entry("AMZN", dec!(9), true),
            entry("GOOGL", dec!(8), true),
        ]
    }

    #[test]
    fn test_weight_bounds() {
        for policy in [SelectionPolicy::HoldCash, SelectionPolicy::Backfill] {
            let mut ranked = Ranker::new(3, policy).rank(universe());
            WeightAssigner::new(3, dec!(1.5)).assign(&mut ranked);

            let total: Decimal = ranked.iter().map(|e| e.target_weight).sum();
            let count = ranked.iter().filter(|e| !e.target_weight.is_zero()).count();

            assert!(total <= dec!(1.5));
            assert!(count <= 3);
        }
    }

    #[test]
    fn test_trend_filter_gives_zero_weight() {
        let mut ranked = Ranker::new(3, SelectionPolicy::HoldCash).rank(universe());
        WeightAssigner::new(3, dec!(1)).assign(&mut ranked);

        let intc = ranked.iter().find(|e| e.instrument.as_str() == "INTC").unwrap();
        assert_eq!(intc.target_weight, Decimal::ZERO);

        let weights = WeightAssigner::weights(&ranked);
        let nonzero: Vec<&str> = weights
            .iter()
            .filter(|(_, w)| !w.is_zero())
            .map(|(i, _)| i.as_str())
            .collect();
        assert_eq!(nonzero, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_backfill_fills_all_slots() {
        let mut ranked = Ranker::new(3, SelectionPolicy::Backfill).rank(universe());
        let assigner = WeightAssigner::new(3, dec!(0.9));
        assigner.assign(&mut ranked);

        let total: Decimal = ranked.iter().map(|e| e.target_weight).sum();
        assert_eq!(assigner.slot_weight(), dec!(0.3));
        assert_eq!(total, dec!(0.9));
    }

    #[test]
    fn test_zero_leverage() {
        let mut ranked = Ranker::new(2, SelectionPolicy::HoldCash).rank(universe());
        WeightAssigner::new(2, Decimal::ZERO).assign(&mut ranked);

        assert!(ranked.iter().all(|e| e.target_weight.is_zero()));
    }
}
