//! Core traits for the rotation engine.

mod broker;
mod config;
mod data_source;
mod indicator;

pub use broker::Broker;
pub use config::Validate;
pub use data_source::DataSource;
pub use indicator::{Indicator, StreamingIndicator};
