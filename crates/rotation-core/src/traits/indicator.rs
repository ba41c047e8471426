//! Indicator trait definitions.

use rust_decimal::Decimal;

/// Trait for batch indicators over a price series.
///
/// Indicators degrade gracefully: a series shorter than the period is
/// computed over what is available instead of failing.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Compute the indicator value at the end of `data` (oldest first).
    ///
    /// # Returns
    /// `None` only when `data` is empty
    fn compute(&self, data: &[Decimal]) -> Option<Self::Output>;

    /// Get the nominal number of data points used.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}

/// Streaming indicator that maintains internal state.
///
/// Unlike batch indicators, streaming indicators are updated
/// incrementally through `observe`, and must be reset explicitly.
pub trait StreamingIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Feed a new value.
    ///
    /// # Returns
    /// The current indicator value, or None if nothing has been observed
    fn observe(&mut self, value: Decimal) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if a full period has been observed.
    fn is_ready(&self) -> bool;

    /// Get the period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
