//! Expense tracking for the application.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and the payload for creating one
//! - The client for the expense service and the in-memory store it fills
//! - Filtering, validation of the create form, and submission
//! - View handlers for the expense list and the add expense page

mod aggregation;
mod charts;
mod client;
mod core;
mod create_page;
mod filter;
mod form;
mod list_page;
mod store;

pub use client::{ApiClientConfig, ExpenseClient, HttpExpenseClient};
pub use self::core::{Expense, ExpenseId, NewExpense, PaymentMethod};
pub use create_page::{get_add_expense_page, post_add_expense};
pub use filter::{ExpenseListQuery, FilterCriteria, FilteredExpenses, apply_filter};
pub use form::{
    EditingState, ExpenseForm, FieldError, SubmissionOutcome, ValidationErrors, submit_expense,
};
pub use list_page::get_expenses_page;
pub use store::ExpenseStore;

#[cfg(test)]
pub(crate) use store::test_utils;
