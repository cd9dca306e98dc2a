//! # Holding Entity
//!
//! A customer's owned quantity of one ticker.
//!
//! Holdings are created lazily at zero quantity on the first buy of a
//! ticker and are never deleted, even when sold down to zero. The quantity
//! is never negative: [`Holding::remove`] refuses any amount that exceeds
//! the current position.

use crate::domain::value_objects::{CustomerId, Ticker};
use serde::{Deserialize, Serialize};

/// A (customer, ticker) position owned by the ledger.
///
/// # Examples
///
/// ```
/// use stock_portfolio::domain::entities::Holding;
/// use stock_portfolio::domain::value_objects::{CustomerId, Ticker};
///
/// let mut holding = Holding::empty(CustomerId::new(1), Ticker::Google);
/// holding.add(2);
/// assert_eq!(holding.quantity(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    customer_id: CustomerId,
    ticker: Ticker,
    quantity: i64,
}

impl Holding {
    /// Creates a holding with the given quantity.
    ///
    /// A negative quantity is clamped to zero.
    #[must_use]
    pub fn new(customer_id: CustomerId, ticker: Ticker, quantity: i64) -> Self {
        Self {
            customer_id,
            ticker,
            quantity: quantity.max(0),
        }
    }

    /// Creates the implicit zero-quantity holding used on a first buy.
    #[must_use]
    pub fn empty(customer_id: CustomerId, ticker: Ticker) -> Self {
        Self::new(customer_id, ticker, 0)
    }

    /// Returns the owning customer.
    #[inline]
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the ticker of this position.
    #[inline]
    #[must_use]
    pub const fn ticker(&self) -> Ticker {
        self.ticker
    }

    /// Returns the owned quantity.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Returns true if the position covers the given quantity.
    #[inline]
    #[must_use]
    pub const fn covers(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }

    /// Adds shares to the position.
    pub fn add(&mut self, quantity: i64) {
        self.quantity = self.quantity.saturating_add(quantity.max(0));
    }

    /// Removes shares from the position.
    ///
    /// Returns `false` and leaves the quantity untouched if the amount
    /// exceeds the current position.
    pub fn remove(&mut self, quantity: i64) -> bool {
        if quantity < 0 || !self.covers(quantity) {
            return false;
        }
        self.quantity -= quantity;
        true
    }
}
