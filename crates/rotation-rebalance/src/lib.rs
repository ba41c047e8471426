//! Turns target weights into order intents.
//!
//! Each instrument is sized to `liquidity * weight / price`. The resulting
//! deltas are sent all together or not at all, depending on whether the
//! turnover clears `min_pct_diff`.

mod config;
mod rebalancer;
mod sizing;

pub use config::RebalanceConfig;
pub use rebalancer::{RebalanceDecision, Rebalancer};
pub use sizing::TargetLine;
