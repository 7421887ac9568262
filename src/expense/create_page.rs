//! The page and form handler for adding an expense.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use maud::{Markup, html};

use crate::{
    AppState, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
    },
};

use super::{
    client::ExpenseClient,
    core::PaymentMethod,
    form::{EditingState, ExpenseForm, FieldError, SubmissionOutcome, submit_expense},
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The client for the expense service.
    pub client: Arc<dyn ExpenseClient>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            client: state.client.clone(),
        }
    }
}

/// Renders the empty add expense form.
pub async fn get_add_expense_page() -> Response {
    add_expense_view(&EditingState::default()).into_response()
}

/// A route handler for creating a new expense, redirects to the expense list on success.
///
/// Invalid input re-renders the form with the errors next to each field. If
/// the expense service fails, the form is re-rendered with the user's input
/// and an alert.
pub async fn post_add_expense(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let outcome = submit_expense(form, state.client.as_ref()).await;

    let status = match &outcome {
        SubmissionOutcome::Succeeded(expense) => {
            tracing::info!("created expense {}", expense.id);
            return Redirect::to(endpoints::EXPENSES_VIEW).into_response();
        }
        SubmissionOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    };

    (status, add_expense_view(&outcome.into_editing_state())).into_response()
}

fn add_expense_view(state: &EditingState) -> Markup {
    let form = &state.form;
    let errors = &state.errors;
    let selected_payment_method = form.selected_payment_method();

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="post"
                action=(endpoints::ADD_EXPENSE_VIEW)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Add Expense" }

                div id="alert-container"
                {
                    @if let Some(error) = &state.submission_error {
                        (error.to_alert().into_html())
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        value=(form.amount)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error("amount", errors.amount.as_ref()))
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        name="description"
                        id="description"
                        type="text"
                        placeholder="Description"
                        value=(form.description)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error("description", errors.description.as_ref()))
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        name="date"
                        id="date"
                        type="date"
                        value=(form.date)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error("date", errors.date.as_ref()))
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    input
                        name="category"
                        id="category"
                        type="text"
                        placeholder="Category"
                        value=(form.category)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);

                    (field_error("category", errors.category.as_ref()))
                }

                fieldset
                {
                    legend class=(FORM_LABEL_STYLE) { "Payment Method" }

                    div class=(FORM_RADIO_GROUP_STYLE)
                    {
                        @for payment_method in PaymentMethod::ALL {
                            @let id = format!("payment-method-{}", payment_method.as_str());
                            div class="flex items-center gap-2"
                            {
                                input
                                    type="radio"
                                    name="payment_method"
                                    id=(id)
                                    value=(payment_method.as_str())
                                    checked[payment_method == selected_payment_method]
                                    class=(FORM_RADIO_INPUT_STYLE);

                                label for=(id) class=(FORM_RADIO_LABEL_STYLE)
                                {
                                    (payment_method.label())
                                }
                            }
                        }
                    }

                    (field_error("payment_method", errors.payment_method.as_ref()))
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Add Expense"
                }

                p class="text-sm"
                {
                    a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "Back to expenses" }
                }
            }
        }
    };

    base("Add Expense", &[], &content)
}

fn field_error(field: &str, error: Option<&FieldError>) -> Markup {
    html! {
        @if let Some(error) = error {
            p id=(format!("{field}-error")) class=(FORM_ERROR_STYLE) { (error) }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use scraper::{Html, Selector};

    use crate::{
        endpoints,
        expense::{form::ExpenseForm, store::test_utils::FakeExpenseClient},
    };

    use super::{CreateExpenseState, get_add_expense_page, post_add_expense};

    fn test_server(client: Arc<FakeExpenseClient>) -> TestServer {
        let app = Router::new()
            .route(endpoints::ADD_EXPENSE_VIEW, get(get_add_expense_page))
            .route(endpoints::ADD_EXPENSE_VIEW, post(post_add_expense))
            .with_state(CreateExpenseState { client });

        TestServer::new(app)
    }

    fn valid_form() -> ExpenseForm {
        ExpenseForm {
            amount: "12.50".to_owned(),
            description: "Lunch".to_owned(),
            date: "2024-02-15".to_owned(),
            category: "food".to_owned(),
            payment_method: "credit".to_owned(),
        }
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn input_value(html: &Html, id: &str) -> String {
        let selector = Selector::parse(&format!("input#{id}")).unwrap();
        html.select(&selector)
            .next()
            .unwrap_or_else(|| panic!("No input with id {id}"))
            .value()
            .attr("value")
            .unwrap_or_default()
            .to_owned()
    }

    #[tokio::test]
    async fn add_expense_page_renders_empty_form() {
        let server = test_server(Arc::new(FakeExpenseClient::default()));

        let response = server.get(endpoints::ADD_EXPENSE_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        for id in ["amount", "description", "date", "category"] {
            assert_eq!(input_value(&html, id), "", "want empty {id}");
        }
        let checked = Selector::parse("input[name='payment_method'][checked]").unwrap();
        let checked = html.select(&checked).next().expect("No checked payment method");
        assert_eq!(checked.value().attr("value"), Some("cash"));
    }

    #[tokio::test]
    async fn valid_expense_redirects_to_expense_list() {
        let client = Arc::new(FakeExpenseClient::default());
        let server = test_server(client.clone());

        let response = server
            .post(endpoints::ADD_EXPENSE_VIEW)
            .form(&valid_form())
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::EXPENSES_VIEW);
        assert_eq!(client.create_calls(), 1);
        let created = client.expenses.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].description, "Lunch");
        assert_eq!(created[0].amount, 12.5);
    }

    #[tokio::test]
    async fn invalid_expense_shows_field_errors_and_keeps_input() {
        let client = Arc::new(FakeExpenseClient::default());
        let server = test_server(client.clone());

        let response = server
            .post(endpoints::ADD_EXPENSE_VIEW)
            .form(&ExpenseForm {
                amount: "-5".to_owned(),
                category: String::new(),
                ..valid_form()
            })
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(client.create_calls(), 0);

        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let amount_error = Selector::parse("#amount-error").unwrap();
        let amount_error = html
            .select(&amount_error)
            .next()
            .expect("No amount error")
            .text()
            .collect::<String>();
        assert_eq!(amount_error, "Amount must be a positive number");
        let category_error = Selector::parse("#category-error").unwrap();
        assert!(html.select(&category_error).next().is_some());
        let description_error = Selector::parse("#description-error").unwrap();
        assert!(html.select(&description_error).next().is_none());
        assert_eq!(input_value(&html, "amount"), "-5");
        assert_eq!(input_value(&html, "description"), "Lunch");
    }

    #[tokio::test]
    async fn service_failure_shows_alert_and_keeps_input() {
        let client = Arc::new(FakeExpenseClient::failing());
        let server = test_server(client.clone());

        let response = server
            .post(endpoints::ADD_EXPENSE_VIEW)
            .form(&valid_form())
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        assert_eq!(client.create_calls(), 1);

        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let alert = Selector::parse("#alert-container div[role='alert']").unwrap();
        let alert = html
            .select(&alert)
            .next()
            .expect("No alert")
            .text()
            .collect::<String>();
        assert!(alert.contains("Could not save expense"), "got alert {alert}");
        assert_eq!(input_value(&html, "description"), "Lunch");
        let checked = Selector::parse("input[name='payment_method'][checked]").unwrap();
        let checked = html.select(&checked).next().expect("No checked payment method");
        assert_eq!(checked.value().attr("value"), Some("credit"));
    }
}
