//! Momentum ranking and slot selection.

use rotation_core::types::Instrument;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::PriceState;

/// What happens to a top slot whose instrument fails the trend filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    /// The slot stays in cash
    #[default]
    HoldCash,
    /// The next passing instrument in rank order takes the slot
    Backfill,
}

/// One instrument's position in a cycle's ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub instrument: Instrument,
    pub state: PriceState,
    pub target_weight: Decimal,
    /// 1-based rank among ready instruments, `None` when not ready
    pub rank: Option<usize>,
    pub selected: bool,
}

impl RankEntry {
    /// Create an unranked entry with zero weight.
    pub fn new(instrument: Instrument, state: PriceState) -> Self {
        Self {
            instrument,
            state,
            target_weight: Decimal::ZERO,
            rank: None,
            selected: false,
        }
    }
}

/// Orders entries by trailing return, highest first.
///
/// Equal returns compare equal, so a stable sort keeps registration order.
pub fn by_trailing_return(a: &RankEntry, b: &RankEntry) -> Ordering {
    b.state.trailing_return.cmp(&a.state.trailing_return)
}

/// Ranks ready instruments and marks the selected slots.
#[derive(Debug, Clone)]
pub struct Ranker {
    top_k: usize,
    policy: SelectionPolicy,
}

impl Ranker {
    pub fn new(top_k: usize, policy: SelectionPolicy) -> Self {
        Self { top_k, policy }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Rank `entries` (given in registration order).
    ///
    /// Ready entries come first, sorted by trailing return; entries that are
    /// not ready follow in registration order, unranked and unselected.
    pub fn rank(&self, entries: Vec<RankEntry>) -> Vec<RankEntry> {
        let (mut ready, not_ready): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.state.is_ready);

        ready.sort_by(by_trailing_return);

        let mut filled = 0;
        for (i, entry) in ready.iter_mut().enumerate() {
            entry.rank = Some(i + 1);
            entry.selected = false;

            let in_slot = match self.policy {
                SelectionPolicy::HoldCash => i < self.top_k,
                SelectionPolicy::Backfill => filled < self.top_k,
            };
            if !in_slot {
                continue;
            }

            if entry.state.is_uptrend() {
                entry.selected = true;
                filled += 1;
            } else {
                debug!(
                    instrument = %entry.instrument,
                    trend = %entry.state.trend(),
                    "Trend filter rejected slot"
                );
            }
        }

        ready.extend(not_ready);
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn state(trailing_return: Decimal, uptrend: bool) -> PriceState {
        PriceState {
            long_average: dec!(100),
            short_average: if uptrend { dec!(101) } else { dec!(99) },
            trailing_return,
            samples: 10,
            is_ready: true,
        }
    }

    fn entry(name: &str, trailing_return: Decimal, uptrend: bool) -> RankEntry {
        RankEntry::new(Instrument::new(name), state(trailing_return, uptrend))
    }

    fn selected(entries: &[RankEntry]) -> Vec<&str> {
        entries
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.instrument.as_str())
            .collect()
    }

    #[test]
    fn test_stable_tie_break() {
        let ranker = Ranker::new(2, SelectionPolicy::HoldCash);
        let ranked = ranker.rank(vec![
            entry("A", dec!(0.05), true),
            entry("B", dec!(0.05), true),
            entry("C", dec!(0.03), true),
        ]);

        let order: Vec<&str> = ranked.iter().map(|e| e.instrument.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(selected(&ranked), vec!["A", "B"]);
        assert_eq!(ranked[2].rank, Some(3));
    }

    #[test]
    fn test_sorted_descending() {
        let ranker = Ranker::new(1, SelectionPolicy::HoldCash);
        let ranked = ranker.rank(vec![
            entry("LOW", dec!(-2), true),
            entry("HIGH", dec!(7), true),
            entry("MID", dec!(3), true),
        ]);

        let order: Vec<&str> = ranked.iter().map(|e| e.instrument.as_str()).collect();
        assert_eq!(order, vec!["HIGH", "MID", "LOW"]);
        assert_eq!(selected(&ranked), vec!["HIGH"]);
    }

    #[test]
    fn test_hold_cash_leaves_failing_slot_empty() {
        let ranker = Ranker::new(2, SelectionPolicy::HoldCash);
        let ranked = ranker.rank(vec![
            entry("A", dec!(9), false),
            entry("B", dec!(8), true),
            entry("C", dec!(7), true),
        ]);

        assert_eq!(selected(&ranked), vec!["B"]);
    }

    #[test]
    fn test_backfill_takes_next_passing() {
        let ranker = Ranker::new(2, SelectionPolicy::Backfill);
        let ranked = ranker.rank(vec![
            entry("A", dec!(9), false),
            entry("B", dec!(8), true),
            entry("C", dec!(7), true),
            entry("D", dec!(6), true),
        ]);

        assert_eq!(selected(&ranked), vec!["B", "C"]);
    }

    #[test]
    fn test_not_ready_is_unranked() {
        let ranker = Ranker::new(3, SelectionPolicy::HoldCash);
        let ranked = ranker.rank(vec![
            RankEntry::new(Instrument::new("NEW"), PriceState::not_ready(0)),
            entry("A", dec!(1), true),
        ]);

        assert_eq!(ranked[0].instrument.as_str(), "A");
        assert_eq!(ranked[1].rank, None);
        assert!(!ranked[1].selected);
    }

    #[test]
    fn test_zero_trend_fails_filter() {
        let mut flat = entry("FLAT", dec!(5), true);
        flat.state.short_average = flat.state.long_average;

        let ranked = Ranker::new(1, SelectionPolicy::Backfill).rank(vec![flat]);
        assert!(selected(&ranked).is_empty());
    }

    #[test]
    fn test_comparator() {
        let a = entry("A", dec!(2), true);
        let b = entry("B", dec!(1), true);

        assert_eq!(by_trailing_return(&a, &b), Ordering::Less);
        assert_eq!(by_trailing_return(&b, &a), Ordering::Greater);
        assert_eq!(by_trailing_return(&a, &a), Ordering::Equal);
    }
}
