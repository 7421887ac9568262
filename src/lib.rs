//! Expense Tracker is a web app for recording expenses and reviewing them.
//!
//! This library serves HTML pages for listing, filtering and adding expenses.
//! Expenses are persisted by a separate expense service that is reached over
//! HTTP, and the most recently fetched collection is kept in memory.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod endpoints;
mod error;
mod expense;
mod html;
mod logging;
mod pagination;
mod routing;

pub use app_state::AppState;
pub use error::Error;
pub use expense::{
    ApiClientConfig, EditingState, Expense, ExpenseClient, ExpenseForm, ExpenseId,
    ExpenseListQuery, ExpenseStore, FieldError, FilterCriteria, FilteredExpenses,
    HttpExpenseClient, NewExpense, PaymentMethod, SubmissionOutcome, ValidationErrors,
    apply_filter, submit_expense,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{
    PaginationConfig, has_next, has_previous, next_page, page, page_count, previous_page,
};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
