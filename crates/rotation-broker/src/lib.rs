//! Broker implementations.

mod paper;

pub use paper::{OrderStatus, PaperBroker, PaperOrder};
