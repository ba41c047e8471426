//! Momentum rotation strategy.
//!
//! This crate turns price windows into target portfolio weights:
//! - `MomentumCalculator` derives long/short averages and the trailing return
//! - `MomentumAccumulator` is the streaming alternative, owned across cycles
//! - `Ranker` orders by trailing return and applies the trend filter
//! - `WeightAssigner` spreads the leverage evenly over the selected slots

mod config;
mod momentum;
mod ranker;
mod weights;

pub use config::{Averaging, RotationConfig};
pub use momentum::{MomentumAccumulator, MomentumCalculator, PriceState};
pub use ranker::{by_trailing_return, RankEntry, Ranker, SelectionPolicy};
pub use weights::WeightAssigner;
