//! # Ledger Service
//!
//! Atomic application of priced orders to customer balances and holdings.
//!
//! The ledger is the exclusive owner of both record types. Every trade is
//! a read-validate-write sequence inside one [`LedgerTransaction`]: the
//! customer and holding updates commit together or not at all, and trades
//! for the same customer serialize on the transaction's per-customer
//! scope.

use crate::domain::entities::Holding;
use crate::domain::trade::{CustomerInformation, HoldingView, PricedOrder, TradeResult};
use crate::domain::value_objects::{CustomerId, TradeAction};
use crate::infrastructure::persistence::traits::{LedgerStore, RepositoryError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The customer does not exist.
    #[error("customer [id={0}] is not found")]
    CustomerNotFound(CustomerId),

    /// The customer's balance does not cover the buy.
    #[error("customer [id={0}] has insufficient funds")]
    InsufficientFunds(CustomerId),

    /// The customer's holding does not cover the sell.
    #[error("customer [id={0}] has insufficient shares")]
    InsufficientShares(CustomerId),

    /// The persistence backend failed; nothing was applied.
    #[error("ledger store error: {0}")]
    Store(#[from] RepositoryError),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Port through which the orchestrator reaches the ledger.
#[async_trait]
pub trait TradeExecutor: Send + Sync + fmt::Debug {
    /// Atomically applies a priced order to a customer's records.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] and leaves both records untouched if the
    /// customer is unknown, the balance or holding does not cover the
    /// order, or the store rejects the commit.
    async fn execute_trade(
        &self,
        customer_id: CustomerId,
        order: PricedOrder,
    ) -> LedgerResult<TradeResult>;

    /// Returns a customer with all their holdings.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::CustomerNotFound` if the customer is unknown.
    async fn customer_information(
        &self,
        customer_id: CustomerId,
    ) -> LedgerResult<CustomerInformation>;
}

/// The ledger service over a [`LedgerStore`] backend.
#[derive(Debug, Clone)]
pub struct LedgerService {
    store: Arc<dyn LedgerStore>,
}

impl LedgerService {
    /// Creates a ledger over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TradeExecutor for LedgerService {
    async fn execute_trade(
        &self,
        customer_id: CustomerId,
        order: PricedOrder,
    ) -> LedgerResult<TradeResult> {
        // The transaction holds the customer's scope for the whole
        // read-validate-write sequence; dropping it on any error path
        // rolls everything back.
        let mut txn = self.store.begin(customer_id).await?;
        let mut customer = txn
            .customer()
            .cloned()
            .ok_or(LedgerError::CustomerNotFound(customer_id))?;
        let total_price = order.total_price();

        match order.action {
            TradeAction::Buy => {
                let mut holding = txn
                    .holding(order.ticker)
                    .cloned()
                    .unwrap_or_else(|| Holding::empty(customer_id, order.ticker));
                if !customer.withdraw(total_price) {
                    return Err(LedgerError::InsufficientFunds(customer_id));
                }
                holding.add(order.quantity);
                txn.put_customer(customer.clone());
                txn.put_holding(holding);
            }
            TradeAction::Sell => {
                let mut holding = txn
                    .holding(order.ticker)
                    .cloned()
                    .ok_or(LedgerError::InsufficientShares(customer_id))?;
                if !holding.remove(order.quantity) {
                    return Err(LedgerError::InsufficientShares(customer_id));
                }
                customer.deposit(total_price);
                txn.put_customer(customer.clone());
                txn.put_holding(holding);
            }
        }

        txn.commit().await?;
        tracing::info!(
            customer = %customer_id,
            ticker = %order.ticker,
            action = %order.action,
            quantity = order.quantity,
            total_price,
            balance = customer.balance(),
            "trade executed"
        );
        Ok(TradeResult::from_order(
            customer_id,
            &order,
            customer.balance(),
        ))
    }

    async fn customer_information(
        &self,
        customer_id: CustomerId,
    ) -> LedgerResult<CustomerInformation> {
        let customer = self
            .store
            .find_customer(customer_id)
            .await?
            .ok_or(LedgerError::CustomerNotFound(customer_id))?;
        let holdings = self
            .store
            .find_holdings(customer_id)
            .await?
            .into_iter()
            .map(|h| HoldingView {
                ticker: h.ticker(),
                quantity: h.quantity(),
            })
            .collect();
        Ok(CustomerInformation {
            id: customer.id(),
            name: customer.name().to_string(),
            balance: customer.balance(),
            holdings,
        })
    }
}
