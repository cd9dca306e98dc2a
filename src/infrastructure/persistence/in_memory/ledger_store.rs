//! # In-Memory Ledger Store
//!
//! Thread-safe in-memory implementation of [`LedgerStore`].
//!
//! Each customer's records live behind their own `tokio::sync::Mutex`, so
//! transactions for the same customer serialize while different customers
//! never block each other. A transaction stages its writes in working
//! copies and publishes them under the lock in a single step on commit;
//! dropping the transaction releases the lock and discards the copies.

use crate::domain::entities::{Customer, Holding};
use crate::domain::value_objects::{CustomerId, Ticker};
use crate::infrastructure::persistence::traits::{
    LedgerStore, LedgerTransaction, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, OwnedMutexGuard};

/// All records of one customer, guarded by one lock.
#[derive(Debug)]
struct Account {
    customer: Customer,
    holdings: HashMap<Ticker, Holding>,
}

/// In-memory implementation of [`LedgerStore`].
///
/// # Examples
///
/// ```
/// use stock_portfolio::domain::entities::Customer;
/// use stock_portfolio::domain::value_objects::CustomerId;
/// use stock_portfolio::infrastructure::persistence::InMemoryLedgerStore;
///
/// let store = InMemoryLedgerStore::new();
/// store.insert_customer(Customer::new(CustomerId::new(1), "Sam", 10000));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    accounts: DashMap<CustomerId, Arc<Mutex<Account>>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl InMemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the demo dataset: customers Sam, Mike,
    /// and John (ids 1 to 3) with a balance of 10000 each.
    #[must_use]
    pub fn with_demo_data() -> Self {
        let store = Self::new();
        for (id, name) in [(1, "Sam"), (2, "Mike"), (3, "John")] {
            store.insert_customer(Customer::new(CustomerId::new(id), name, 10000));
        }
        store
    }

    /// Inserts or replaces a customer record with no holdings.
    pub fn insert_customer(&self, customer: Customer) {
        self.accounts.insert(
            customer.id(),
            Arc::new(Mutex::new(Account {
                customer,
                holdings: HashMap::new(),
            })),
        );
    }

    /// Makes the next commit fail and roll back.
    ///
    /// Test hook for exercising the all-or-nothing contract without a
    /// fallible backend.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn account(&self, id: CustomerId) -> Option<Arc<Mutex<Account>>> {
        self.accounts.get(&id).map(|entry| Arc::clone(entry.value()))
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn find_customer(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        match self.account(id) {
            Some(account) => Ok(Some(account.lock().await.customer.clone())),
            None => Ok(None),
        }
    }

    async fn find_holdings(&self, id: CustomerId) -> RepositoryResult<Vec<Holding>> {
        match self.account(id) {
            Some(account) => {
                let guard = account.lock().await;
                let mut holdings: Vec<Holding> = guard.holdings.values().cloned().collect();
                holdings.sort_by_key(|h| h.ticker().as_str());
                Ok(holdings)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn begin(&self, id: CustomerId) -> RepositoryResult<Box<dyn LedgerTransaction>> {
        let guard = match self.account(id) {
            Some(account) => Some(account.lock_owned().await),
            None => None,
        };
        Ok(Box::new(InMemoryTransaction {
            guard,
            staged_customer: None,
            staged_holdings: HashMap::new(),
            fail_commit: Arc::clone(&self.fail_next_commit),
        }))
    }
}

/// Transaction over one in-memory account.
///
/// Holds the account's owned lock for its whole lifetime, which is what
/// serializes concurrent trades for the same customer.
struct InMemoryTransaction {
    guard: Option<OwnedMutexGuard<Account>>,
    staged_customer: Option<Customer>,
    staged_holdings: HashMap<Ticker, Holding>,
    fail_commit: Arc<AtomicBool>,
}

#[async_trait]
impl LedgerTransaction for InMemoryTransaction {
    fn customer(&self) -> Option<&Customer> {
        self.staged_customer
            .as_ref()
            .or_else(|| self.guard.as_deref().map(|account| &account.customer))
    }

    fn holding(&self, ticker: Ticker) -> Option<&Holding> {
        self.staged_holdings.get(&ticker).or_else(|| {
            self.guard
                .as_deref()
                .and_then(|account| account.holdings.get(&ticker))
        })
    }

    fn put_customer(&mut self, customer: Customer) {
        self.staged_customer = Some(customer);
    }

    fn put_holding(&mut self, holding: Holding) {
        self.staged_holdings.insert(holding.ticker(), holding);
    }

    async fn commit(mut self: Box<Self>) -> RepositoryResult<()> {
        if self.fail_commit.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::commit_failed("injected commit failure"));
        }
        let Some(account) = self.guard.as_deref_mut() else {
            // Nothing was loadable, so nothing can have been staged
            // against a real record.
            return Ok(());
        };
        if let Some(customer) = self.staged_customer.take() {
            account.customer = customer;
        }
        for (ticker, holding) in self.staged_holdings.drain() {
            account.holdings.insert(ticker, holding);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn store_with_sam() -> InMemoryLedgerStore {
        let store = InMemoryLedgerStore::new();
        store.insert_customer(Customer::new(CustomerId::new(1), "Sam", 10000));
        store
    }

    #[tokio::test]
    async fn find_customer_returns_seeded_record() {
        let store = store_with_sam();
        let customer = store.find_customer(CustomerId::new(1)).await.unwrap();
        assert_eq!(customer.unwrap().balance(), 10000);
    }

    #[tokio::test]
    async fn find_customer_unknown_returns_none() {
        let store = store_with_sam();
        let customer = store.find_customer(CustomerId::new(99)).await.unwrap();
        assert!(customer.is_none());
    }

    #[tokio::test]
    async fn commit_publishes_both_records_together() {
        let store = store_with_sam();
        let id = CustomerId::new(1);

        let mut txn = store.begin(id).await.unwrap();
        let mut customer = txn.customer().unwrap().clone();
        assert!(customer.withdraw(220));
        txn.put_customer(customer);
        let mut holding = Holding::empty(id, Ticker::Google);
        holding.add(2);
        txn.put_holding(holding);
        txn.commit().await.unwrap();

        let customer = store.find_customer(id).await.unwrap().unwrap();
        assert_eq!(customer.balance(), 9780);
        let holdings = store.find_holdings(id).await.unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings[0].quantity(), 2);
    }

    #[tokio::test]
    async fn drop_without_commit_rolls_back() {
        let store = store_with_sam();
        let id = CustomerId::new(1);

        {
            let mut txn = store.begin(id).await.unwrap();
            let mut customer = txn.customer().unwrap().clone();
            assert!(customer.withdraw(220));
            txn.put_customer(customer);
            txn.put_holding(Holding::new(id, Ticker::Google, 2));
            // txn dropped here without commit
        }

        let customer = store.find_customer(id).await.unwrap().unwrap();
        assert_eq!(customer.balance(), 10000);
        assert!(store.find_holdings(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_commit_applies_nothing() {
        let store = store_with_sam();
        let id = CustomerId::new(1);
        store.fail_next_commit();

        let mut txn = store.begin(id).await.unwrap();
        let mut customer = txn.customer().unwrap().clone();
        assert!(customer.withdraw(220));
        txn.put_customer(customer);
        txn.put_holding(Holding::new(id, Ticker::Google, 2));
        let err = txn.commit().await.unwrap_err();
        assert!(err.to_string().contains("Commit failed"));

        let customer = store.find_customer(id).await.unwrap().unwrap();
        assert_eq!(customer.balance(), 10000);
        assert!(store.find_holdings(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn staged_writes_are_visible_inside_the_transaction() {
        let store = store_with_sam();
        let id = CustomerId::new(1);

        let mut txn = store.begin(id).await.unwrap();
        txn.put_holding(Holding::new(id, Ticker::Google, 5));
        assert_eq!(txn.holding(Ticker::Google).unwrap().quantity(), 5);
        assert!(txn.holding(Ticker::Apple).is_none());
    }

    #[tokio::test]
    async fn same_customer_transactions_serialize() {
        let store = store_with_sam();
        let id = CustomerId::new(1);

        let txn = store.begin(id).await.unwrap();
        // A second transaction for the same customer must block until the
        // first one is gone.
        let second = tokio::time::timeout(Duration::from_millis(50), store.begin(id));
        assert!(second.await.is_err());

        drop(txn);
        let second = tokio::time::timeout(Duration::from_millis(50), store.begin(id));
        assert!(second.await.is_ok());
    }

    #[tokio::test]
    async fn different_customers_do_not_block() {
        let store = InMemoryLedgerStore::with_demo_data();

        let _sam = store.begin(CustomerId::new(1)).await.unwrap();
        let mike = tokio::time::timeout(
            Duration::from_millis(50),
            store.begin(CustomerId::new(2)),
        );
        assert!(mike.await.is_ok());
    }
}
