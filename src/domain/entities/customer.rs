//! # Customer Entity
//!
//! A customer and their cash balance in currency minor units.
//!
//! The balance is never negative: [`Customer::withdraw`] refuses any amount
//! that would overdraw the account, so the invariant holds at every
//! observable state boundary.

use crate::domain::value_objects::CustomerId;
use serde::{Deserialize, Serialize};

/// A customer owned by the ledger.
///
/// # Examples
///
/// ```
/// use stock_portfolio::domain::entities::Customer;
/// use stock_portfolio::domain::value_objects::CustomerId;
///
/// let mut customer = Customer::new(CustomerId::new(1), "Sam", 10000);
/// customer.withdraw(220);
/// assert_eq!(customer.balance(), 9780);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    balance: i64,
}

impl Customer {
    /// Creates a customer with the given starting balance.
    ///
    /// A negative starting balance is clamped to zero.
    #[must_use]
    pub fn new(id: CustomerId, name: impl Into<String>, balance: i64) -> Self {
        Self {
            id,
            name: name.into(),
            balance: balance.max(0),
        }
    }

    /// Returns the customer identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Returns the customer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the balance in currency minor units.
    #[inline]
    #[must_use]
    pub const fn balance(&self) -> i64 {
        self.balance
    }

    /// Returns true if the balance covers the given amount.
    #[inline]
    #[must_use]
    pub const fn can_afford(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Adds the given amount to the balance.
    pub fn deposit(&mut self, amount: i64) {
        self.balance = self.balance.saturating_add(amount.max(0));
    }

    /// Subtracts the given amount from the balance.
    ///
    /// Returns `false` and leaves the balance untouched if the amount would
    /// overdraw the account.
    pub fn withdraw(&mut self, amount: i64) -> bool {
        if amount < 0 || !self.can_afford(amount) {
            return false;
        }
        self.balance -= amount;
        true
    }
}
