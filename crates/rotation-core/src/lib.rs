//! Core types and traits for the rotation engine.
//!
//! This crate provides the foundational building blocks including:
//! - Instrument identifiers and price windows (PriceBar, PriceWindow)
//! - Order intents and portfolio snapshots
//! - Core traits for indicators and the external data/broker collaborators

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BrokerError, ConfigError, DataError};
pub use traits::*;
pub use types::*;
