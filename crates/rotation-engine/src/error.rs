//! Engine errors.

use rotation_core::error::{BrokerError, ConfigError};
use thiserror::Error;

/// Errors that end a cycle or prevent the orchestrator from starting.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Order submission failed after {submitted} order(s): {source}")]
    Submission {
        submitted: usize,
        #[source]
        source: BrokerError,
    },
}
