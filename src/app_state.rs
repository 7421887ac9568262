//! Implements a struct that holds the state of the web server.

use std::sync::Arc;

use crate::{
    expense::{ExpenseClient, ExpenseStore},
    pagination::PaginationConfig,
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The in-memory copy of the expense collection.
    pub store: ExpenseStore,

    /// The client used to fetch and create expenses.
    pub client: Arc<dyn ExpenseClient>,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] with an empty expense store.
    ///
    /// The store is filled the first time the expense list is requested.
    pub fn new(client: Arc<dyn ExpenseClient>, pagination_config: PaginationConfig) -> Self {
        Self {
            store: ExpenseStore::new(),
            client,
            pagination_config,
        }
    }
}
