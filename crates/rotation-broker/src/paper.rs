//! Paper account for replay and tests.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rotation_core::error::BrokerError;
use rotation_core::traits::Broker;
use rotation_core::types::{Instrument, OrderIntent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

/// Latest price of an instrument and the session it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Mark {
    date: NaiveDate,
    price: Decimal,
}

/// Lifecycle of a paper order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Filled,
    Canceled,
}

/// An order in the paper order log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperOrder {
    pub id: Uuid,
    pub intent: OrderIntent,
    pub status: OrderStatus,
    pub fill_price: Option<Decimal>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Account {
    cash: Decimal,
    positions: HashMap<Instrument, Decimal>,
    marks: HashMap<Instrument, Mark>,
}

impl Account {
    fn price(&self, instrument: &Instrument) -> Decimal {
        self.marks
            .get(instrument)
            .map(|m| m.price)
            .unwrap_or(Decimal::ZERO)
    }

    fn holdings_value(&self) -> Decimal {
        self.positions
            .iter()
            .map(|(instrument, quantity)| *quantity * self.price(instrument))
            .sum()
    }

    fn fill(&mut self, instrument: &Instrument, delta: Decimal, price: Decimal) {
        self.cash -= delta * price;
        let position = self
            .positions
            .entry(instrument.clone())
            .or_insert(Decimal::ZERO);
        *position += delta;
        if position.is_zero() {
            self.positions.remove(instrument);
        }
    }
}

/// In-memory account that fills orders immediately at the current mark.
///
/// An instrument's market is open on the session date of its latest mark.
/// Orders for an instrument without a positive mark stay open until
/// canceled.
#[derive(Debug, Clone)]
pub struct PaperBroker {
    account: Arc<Mutex<Account>>,
    orders: Arc<Mutex<Vec<PaperOrder>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, BrokerError> {
    mutex
        .lock()
        .map_err(|_| BrokerError::Internal("paper account lock poisoned".to_string()))
}

impl PaperBroker {
    /// Create a new paper account holding `cash`.
    pub fn new(cash: Decimal) -> Self {
        Self {
            account: Arc::new(Mutex::new(Account {
                cash,
                ..Default::default()
            })),
            orders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the price of an instrument for session `date`.
    pub fn mark(&self, instrument: &Instrument, date: NaiveDate, price: Decimal) -> Result<(), BrokerError> {
        lock(&self.account)?
            .marks
            .insert(instrument.clone(), Mark { date, price });
        Ok(())
    }

    /// Overwrite a position without touching cash.
    pub fn set_position(&self, instrument: &Instrument, quantity: Decimal) -> Result<(), BrokerError> {
        let mut account = lock(&self.account)?;
        if quantity.is_zero() {
            account.positions.remove(instrument);
        } else {
            account.positions.insert(instrument.clone(), quantity);
        }
        Ok(())
    }

    /// Available cash.
    pub fn cash(&self) -> Result<Decimal, BrokerError> {
        Ok(lock(&self.account)?.cash)
    }

    /// Cash plus holdings marked to their latest price.
    pub fn equity(&self) -> Result<Decimal, BrokerError> {
        let account = lock(&self.account)?;
        Ok(account.cash + account.holdings_value())
    }

    /// Non-zero positions, sorted by instrument.
    pub fn positions(&self) -> Result<Vec<(Instrument, Decimal)>, BrokerError> {
        let account = lock(&self.account)?;
        let mut positions: Vec<_> = account
            .positions
            .iter()
            .map(|(i, q)| (i.clone(), *q))
            .collect();
        positions.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(positions)
    }

    /// The full order log, oldest first.
    pub fn orders(&self) -> Result<Vec<PaperOrder>, BrokerError> {
        Ok(lock(&self.orders)?.clone())
    }
}

#[async_trait]
impl Broker for PaperBroker {
    async fn current_price(&self, instrument: &Instrument) -> Result<Decimal, BrokerError> {
        Ok(lock(&self.account)?.price(instrument))
    }

    async fn current_holdings(&self, instrument: &Instrument) -> Result<Decimal, BrokerError> {
        Ok(lock(&self.account)?
            .positions
            .get(instrument)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn total_liquidity(&self) -> Result<Decimal, BrokerError> {
        self.equity()
    }

    async fn is_market_open(
        &self,
        instrument: &Instrument,
        now: DateTime<Utc>,
    ) -> Result<bool, BrokerError> {
        Ok(lock(&self.account)?
            .marks
            .get(instrument)
            .is_some_and(|m| m.date == now.date_naive()))
    }

    async fn cancel_open_orders(&self, instrument: &Instrument) -> Result<usize, BrokerError> {
        let mut orders = lock(&self.orders)?;
        let mut canceled = 0;
        for order in orders
            .iter_mut()
            .filter(|o| o.status == OrderStatus::Open && &o.intent.instrument == instrument)
        {
            order.status = OrderStatus::Canceled;
            canceled += 1;
        }
        Ok(canceled)
    }

    async fn submit_order(&self, intent: &OrderIntent) -> Result<(), BrokerError> {
        if intent.delta_quantity.is_zero() {
            return Err(BrokerError::OrderRejected(format!(
                "zero quantity for {}",
                intent.instrument
            )));
        }

        let fill_price = {
            let mut account = lock(&self.account)?;
            let price = account.price(&intent.instrument);
            if price > Decimal::ZERO {
                account.fill(&intent.instrument, intent.delta_quantity, price);
                Some(price)
            } else {
                None
            }
        };

        let order = PaperOrder {
            id: Uuid::new_v4(),
            intent: intent.clone(),
            status: if fill_price.is_some() {
                OrderStatus::Filled
            } else {
                OrderStatus::Open
            },
            fill_price,
            submitted_at: Utc::now(),
        };
        debug!(id = %order.id, %intent, status = ?order.status, "Paper order");
        lock(&self.orders)?.push(order);

        Ok(())
    }

    fn name(&self) -> &str {
        "Paper Broker"
    }
}
