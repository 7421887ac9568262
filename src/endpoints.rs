//! The endpoint URIs served by this app and the ones it calls on the expense service.

/// The page listing expenses with search, filters, pagination and charts.
pub const EXPENSES_VIEW: &str = "/";
/// The page with the form for creating an expense. The form posts back to the same route.
pub const ADD_EXPENSE_VIEW: &str = "/add-expense";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The expense collection on the expense service, relative to its base URL.
pub const EXPENSES_API: &str = "/api/expenses";
