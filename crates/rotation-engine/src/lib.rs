//! Rebalancing cycle orchestration.
//!
//! `CycleOrchestrator` drives one cycle end to end: cancel stale orders,
//! fetch history, evaluate momentum, rank, weight, plan and submit.

mod error;
mod orchestrator;

pub use error::EngineError;
pub use orchestrator::{CycleOrchestrator, CycleOutcome, CycleReport};
