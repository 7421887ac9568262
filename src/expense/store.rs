//! The in-memory expense collection.
//!
//! The store keeps the most recently fetched collection as an immutable
//! snapshot. [ExpenseStore::load] is the only way to change it.

use std::sync::{Arc, RwLock};

use crate::Error;

use super::{client::ExpenseClient, core::Expense};

/// The shared, in-memory copy of the expense collection.
///
/// Cloning the store is cheap and clones share the same collection.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    expenses: Arc<RwLock<Arc<[Expense]>>>,
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_expenses(Vec::new())
    }

    /// Create a store that starts out holding `expenses`.
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Arc::new(RwLock::new(expenses.into())),
        }
    }

    /// The current collection.
    ///
    /// # Errors
    /// Returns [Error::StoreLockError] if the lock was poisoned.
    pub fn snapshot(&self) -> Result<Arc<[Expense]>, Error> {
        let expenses = self
            .expenses
            .read()
            .inspect_err(|error| tracing::error!("could not acquire expense store lock: {error}"))
            .map_err(|_| Error::StoreLockError)?;

        Ok(Arc::clone(&expenses))
    }

    /// Fetch the full collection from `client` and make it the current snapshot.
    ///
    /// Every call fetches again. The lock is not held while the request is in
    /// flight, so when loads overlap the one that finishes last wins.
    ///
    /// # Errors
    /// Returns [Error::FetchError] if the fetch failed, in which case the
    /// current collection is left unchanged, or [Error::StoreLockError] if the
    /// lock was poisoned.
    pub async fn load(&self, client: &dyn ExpenseClient) -> Result<Arc<[Expense]>, Error> {
        let fetched: Arc<[Expense]> = client
            .fetch_expenses()
            .await
            .inspect_err(|error| tracing::error!("Error fetching expenses: {error}"))?
            .into();

        let mut expenses = self
            .expenses
            .write()
            .inspect_err(|error| tracing::error!("could not acquire expense store lock: {error}"))
            .map_err(|_| Error::StoreLockError)?;
        *expenses = Arc::clone(&fetched);

        tracing::debug!("loaded {} expenses", fetched.len());

        Ok(fetched)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use crate::{
        Error,
        expense::{
            client::ExpenseClient,
            core::{Expense, ExpenseId, NewExpense},
        },
    };

    /// An in-memory stand-in for the expense service.
    #[derive(Debug, Default)]
    pub(crate) struct FakeExpenseClient {
        pub(crate) expenses: Mutex<Vec<Expense>>,
        pub(crate) fail_fetch: bool,
        pub(crate) fail_create: bool,
        pub(crate) fetch_calls: AtomicUsize,
        pub(crate) create_calls: AtomicUsize,
    }

    impl FakeExpenseClient {
        pub(crate) fn with_expenses(expenses: Vec<Expense>) -> Self {
            Self {
                expenses: Mutex::new(expenses),
                ..Default::default()
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail_fetch: true,
                fail_create: true,
                ..Default::default()
            }
        }

        pub(crate) fn fetch_calls(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }

        pub(crate) fn create_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExpenseClient for FakeExpenseClient {
        async fn fetch_expenses(&self) -> Result<Vec<Expense>, Error> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);

            if self.fail_fetch {
                return Err(Error::FetchError("connection refused".to_owned()));
            }

            Ok(self.expenses.lock().unwrap().clone())
        }

        async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, Error> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);

            if self.fail_create {
                return Err(Error::SubmissionError(
                    "expense service responded with 500".to_owned(),
                ));
            }

            let mut expenses = self.expenses.lock().unwrap();
            let created = Expense {
                id: ExpenseId::new(format!("fake-{}", expenses.len() + 1)),
                amount: expense.amount,
                description: expense.description.clone(),
                date: expense.date,
                category: expense.category.clone(),
                payment_method: expense.payment_method,
            };
            expenses.push(created.clone());

            Ok(created)
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        expense::core::{Expense, ExpenseId, PaymentMethod},
    };

    use super::{ExpenseStore, test_utils::FakeExpenseClient};

    fn lunch() -> Expense {
        Expense {
            id: ExpenseId::new("1"),
            amount: 15.0,
            description: "Lunch".to_owned(),
            date: date!(2024 - 01 - 10),
            category: "food".to_owned(),
            payment_method: PaymentMethod::Cash,
        }
    }

    #[tokio::test]
    async fn load_replaces_snapshot() {
        let store = ExpenseStore::new();
        let client = FakeExpenseClient::with_expenses(vec![lunch()]);

        let loaded = store.load(&client).await.unwrap();

        assert_eq!(&*loaded, &[lunch()]);
        assert_eq!(&*store.snapshot().unwrap(), &[lunch()]);
    }

    #[tokio::test]
    async fn load_fetches_every_time() {
        let store = ExpenseStore::new();
        let client = FakeExpenseClient::with_expenses(vec![lunch()]);

        store.load(&client).await.unwrap();
        store.load(&client).await.unwrap();

        assert_eq!(client.fetch_calls(), 2);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_snapshot() {
        let store = ExpenseStore::with_expenses(vec![lunch()]);
        let client = FakeExpenseClient::failing();

        let result = store.load(&client).await;

        assert!(matches!(result, Err(Error::FetchError(_))));
        assert_eq!(&*store.snapshot().unwrap(), &[lunch()]);
    }

    #[tokio::test]
    async fn clones_share_the_collection() {
        let store = ExpenseStore::new();
        let other = store.clone();
        let client = FakeExpenseClient::with_expenses(vec![lunch()]);

        store.load(&client).await.unwrap();

        assert_eq!(other.snapshot().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn later_load_wins() {
        let store = ExpenseStore::new();
        let first = FakeExpenseClient::with_expenses(vec![lunch()]);
        let second = FakeExpenseClient::default();

        store.load(&first).await.unwrap();
        store.load(&second).await.unwrap();

        assert!(store.snapshot().unwrap().is_empty());
    }
}
