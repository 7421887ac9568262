//! The expense list page: filters, one page of the table, paging links and charts.

use std::{collections::BTreeSet, sync::Arc};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_DISABLED_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    pagination::{
        PaginationConfig, has_next, has_previous, next_page, page, page_count, previous_page,
    },
};

use super::{
    charts::{ECHARTS_SCRIPT, charts_script, charts_view, expense_charts},
    client::ExpenseClient,
    core::{Expense, PaymentMethod},
    filter::{ExpenseListQuery, FilteredExpenses},
    store::ExpenseStore,
};

/// The state needed for the expense list page.
#[derive(Debug, Clone)]
pub struct ExpenseListState {
    /// The in-memory expense collection.
    pub store: ExpenseStore,
    /// The client for the expense service.
    pub client: Arc<dyn ExpenseClient>,
    /// The config that controls how to display pages of expenses.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ExpenseListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            client: state.client.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Renders a page of the filtered expenses.
///
/// The collection is fetched again on every request. If the expense service
/// cannot be reached the last loaded collection is shown with an alert.
pub async fn get_expenses_page(
    State(state): State<ExpenseListState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Response, Error> {
    let (expenses, alert) = match state.store.load(state.client.as_ref()).await {
        Ok(expenses) => (expenses, None),
        Err(error @ Error::FetchError(_)) => (state.store.snapshot()?, Some(error.to_alert())),
        Err(error) => return Err(error),
    };

    let filtered = FilteredExpenses::new(expenses, query.criteria());
    let page_index = query
        .page_index()
        .unwrap_or(state.pagination_config.default_page)
        .max(1);
    let page_size = state.pagination_config.default_page_size;

    let view = ExpenseListView {
        query: &query,
        filtered: &filtered,
        page_index,
        page_size,
        alert,
    };

    Ok(expense_list_view(view).into_response())
}

struct ExpenseListView<'a> {
    query: &'a ExpenseListQuery,
    filtered: &'a FilteredExpenses,
    page_index: u64,
    page_size: u64,
    alert: Option<Alert>,
}

fn expense_list_view(view: ExpenseListView) -> Markup {
    let ExpenseListView {
        query,
        filtered,
        page_index,
        page_size,
        alert,
    } = view;

    let expenses = filtered.as_slice();
    let current_page = page(expenses, page_index, page_size);
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let categories = distinct_categories(filtered.source());
    let filter_query = query.to_filter_query_string();

    let charts = expense_charts(expenses);
    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
    ];

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-4"
            {
                div class="flex justify-between items-center"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(endpoints::ADD_EXPENSE_VIEW) class=(LINK_STYLE) { "Add Expense" }
                }

                div id="alert-container"
                {
                    @if let Some(alert) = alert {
                        (alert.into_html())
                    }
                }

                (filter_form(query, &categories))

                (expense_table(current_page))

                div class="flex justify-between items-center"
                {
                    p id="summary" class="text-sm"
                    {
                        (expenses.len()) " expenses, " (format_currency(total)) " total"
                    }

                    (pager(&filter_query, expenses, page_index, page_size))
                }

                (charts_view(&charts))
            }
        }
    };

    base("Expenses", &head_elements, &content)
}

fn filter_form(query: &ExpenseListQuery, categories: &[&str]) -> Markup {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let selected_category = query.category.as_deref().unwrap_or_default();
    let selected_payment_method = query.payment_method.as_deref().unwrap_or_default();

    html! {
        form
            id="filters"
            method="get"
            action=(endpoints::EXPENSES_VIEW)
            class="grid grid-cols-1 md:grid-cols-3 gap-4"
        {
            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    name="description"
                    id="description"
                    type="search"
                    placeholder="Search descriptions"
                    value=(text(&query.description))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category_search" class=(FORM_LABEL_STYLE) { "Category search" }
                input
                    name="category_search"
                    id="category_search"
                    type="search"
                    placeholder="Search categories"
                    value=(text(&query.category_search))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All categories" }

                    @for category in categories {
                        option value=(category) selected[*category == selected_category]
                        {
                            (category)
                        }
                    }
                }
            }

            div
            {
                label for="payment_method" class=(FORM_LABEL_STYLE) { "Payment method" }
                select name="payment_method" id="payment_method" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All payment methods" }

                    @for payment_method in PaymentMethod::ALL {
                        option
                            value=(payment_method.as_str())
                            selected[payment_method.as_str() == selected_payment_method]
                        {
                            (payment_method.label())
                        }
                    }
                }
            }

            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    name="start_date"
                    id="start_date"
                    type="date"
                    value=(text(&query.start_date))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    name="end_date"
                    id="end_date"
                    type="date"
                    value=(text(&query.end_date))
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="md:col-span-3 flex gap-4"
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply Filters" }

                a href=(endpoints::EXPENSES_VIEW) class=(BUTTON_SECONDARY_STYLE) { "Clear" }
            }
        }
    }
}

fn expense_table(expenses: &[Expense]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Payment Method" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (format_currency(expense.amount)) }
                            td class=(TABLE_CELL_STYLE) { (expense.description) }
                            td class=(TABLE_CELL_STYLE) { (expense.date) }
                            td class=(TABLE_CELL_STYLE) { (expense.category) }
                            td class=(TABLE_CELL_STYLE) { (expense.payment_method.label()) }
                        }
                    }

                    @if expenses.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="5" class=(TABLE_CELL_STYLE) { "No expenses found." }
                        }
                    }
                }
            }
        }
    }
}

fn pager(filter_query: &str, expenses: &[Expense], page_index: u64, page_size: u64) -> Markup {
    let total_pages = page_count(expenses.len(), page_size);

    html! {
        nav id="pager" aria-label="Pagination" class="flex items-center gap-4"
        {
            @if has_previous(page_index) {
                a
                    id="previous-page"
                    href=(page_url(filter_query, previous_page(page_index)))
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Previous"
                }
            } @else {
                span id="previous-page" aria-disabled="true" class=(BUTTON_DISABLED_STYLE)
                {
                    "Previous"
                }
            }

            span class="text-sm" { "Page " (page_index) " of " (total_pages) }

            @if has_next(expenses, page_index, page_size) {
                a
                    id="next-page"
                    href=(page_url(filter_query, next_page(page_index)))
                    class=(BUTTON_SECONDARY_STYLE)
                {
                    "Next"
                }
            } @else {
                span id="next-page" aria-disabled="true" class=(BUTTON_DISABLED_STYLE)
                {
                    "Next"
                }
            }
        }
    }
}

fn page_url(filter_query: &str, page_index: u64) -> String {
    if filter_query.is_empty() {
        format!("{}?page={page_index}", endpoints::EXPENSES_VIEW)
    } else {
        format!("{}?{filter_query}&page={page_index}", endpoints::EXPENSES_VIEW)
    }
}

fn distinct_categories(expenses: &[Expense]) -> Vec<&str> {
    expenses
        .iter()
        .map(|expense| expense.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
