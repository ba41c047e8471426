//! Replay of the daily rebalancing schedule over stored history.

mod engine;
mod report;
mod statistics;

pub use engine::{ReplayConfig, ReplayEngine, ReplayError};
pub use report::ReplayReport;
pub use statistics::{CycleRecord, ReplayStats};
