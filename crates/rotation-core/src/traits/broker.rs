//! Broker trait definition.

use crate::error::BrokerError;
use crate::types::{Instrument, OrderIntent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Trait for the account, quote and order-routing collaborator.
///
/// The engine only reads account state through this trait and hands it
/// order intents; execution, fills and retries happen behind it.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Current market price of an instrument.
    async fn current_price(&self, instrument: &Instrument) -> Result<Decimal, BrokerError>;

    /// Currently held quantity of an instrument (zero when not held).
    async fn current_holdings(&self, instrument: &Instrument) -> Result<Decimal, BrokerError>;

    /// Cash plus mark-to-market value of all holdings.
    async fn total_liquidity(&self) -> Result<Decimal, BrokerError>;

    /// Check whether the instrument's exchange is open at `now`.
    async fn is_market_open(
        &self,
        instrument: &Instrument,
        now: DateTime<Utc>,
    ) -> Result<bool, BrokerError>;

    /// Cancel every open order of an instrument.
    ///
    /// # Returns
    /// The number of orders canceled
    async fn cancel_open_orders(&self, instrument: &Instrument) -> Result<usize, BrokerError>;

    /// Submit a market order for `intent.delta_quantity`.
    async fn submit_order(&self, intent: &OrderIntent) -> Result<(), BrokerError>;

    /// Get the broker name.
    fn name(&self) -> &str;
}
