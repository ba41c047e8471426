//! History source trait definition.

use crate::error::DataError;
use crate::types::{Instrument, PriceBar, Resolution};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

/// Trait for historical price sources.
///
/// Calls are awaited one at a time by the engine; retries and timeouts are
/// the implementation's business.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch the bars of `instrument` covering `span` calendar time that
    /// ends at `as_of`.
    ///
    /// # Returns
    /// Trading-session bars ordered from oldest to newest. An empty vector
    /// means the instrument has no history yet, which is not an error.
    async fn fetch_history(
        &self,
        instrument: &Instrument,
        as_of: DateTime<Utc>,
        span: Duration,
        resolution: Resolution,
    ) -> Result<Vec<PriceBar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}
