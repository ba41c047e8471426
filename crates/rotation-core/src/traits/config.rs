//! Configuration validation trait.

use crate::error::ConfigError;

/// Settings that must be checked once, before the first cycle runs.
pub trait Validate {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}
