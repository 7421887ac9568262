//! Validation and submission of the create expense form.
//!
//! A submission moves through these states:
//!
//! ```text
//! Editing -> Validating -> Invalid -> Editing (errors shown)
//!                       -> Valid -> Submitting -> Succeeded -> Editing (reset)
//!                                              -> Failed -> Editing (error shown)
//! ```
//!
//! [submit_expense] runs one submission from `Validating` to an outcome, and
//! [SubmissionOutcome::into_editing_state] gives the form state to show next.

use serde::{Deserialize, Serialize};

use crate::Error;

use super::{
    client::ExpenseClient,
    core::{Expense, NewExpense, PaymentMethod, calendar_date},
};

/// The raw values of the create expense form, exactly as the user entered them.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// The amount as typed, should parse as a positive number.
    #[serde(default)]
    pub amount: String,
    /// What the money was spent on.
    #[serde(default)]
    pub description: String,
    /// The date as YYYY-MM-DD.
    #[serde(default)]
    pub date: String,
    /// A free text category.
    #[serde(default)]
    pub category: String,
    /// "cash" or "credit". Empty means cash.
    #[serde(default)]
    pub payment_method: String,
}

/// A problem with a single form field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// No amount was entered.
    #[error("Amount is required")]
    AmountRequired,
    /// The amount is not a number.
    #[error("Amount must be a number")]
    AmountNotNumeric,
    /// The amount is zero or negative.
    #[error("Amount must be a positive number")]
    AmountNotPositive,
    /// No description was entered.
    #[error("Description is required")]
    DescriptionRequired,
    /// No date was entered.
    #[error("Date is required")]
    DateRequired,
    /// The date is not a valid YYYY-MM-DD calendar date.
    #[error("Date must be a valid date")]
    InvalidDate,
    /// No category was entered.
    #[error("Category is required")]
    CategoryRequired,
    /// The payment method is neither cash nor credit.
    #[error("Payment method must be cash or credit")]
    InvalidPaymentMethod,
}

/// The validation errors for each field of [ExpenseForm].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ValidationErrors {
    /// The problem with the amount, if any.
    pub amount: Option<FieldError>,
    /// The problem with the description, if any.
    pub description: Option<FieldError>,
    /// The problem with the date, if any.
    pub date: Option<FieldError>,
    /// The problem with the category, if any.
    pub category: Option<FieldError>,
    /// The problem with the payment method, if any.
    pub payment_method: Option<FieldError>,
}

impl ValidationErrors {
    /// Whether every field is valid.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.payment_method.is_none()
    }
}

impl ExpenseForm {
    /// Check every field, returning the create payload or all field errors.
    pub fn validate(&self) -> Result<NewExpense, ValidationErrors> {
        let amount = validate_amount(&self.amount);
        let description = required_text(&self.description, FieldError::DescriptionRequired);
        let date = validate_date(&self.date);
        let category = required_text(&self.category, FieldError::CategoryRequired);
        let payment_method = validate_payment_method(&self.payment_method);

        match (amount, description, date, category, payment_method) {
            (Ok(amount), Ok(description), Ok(date), Ok(category), Ok(payment_method)) => {
                Ok(NewExpense {
                    amount,
                    description,
                    date,
                    category,
                    payment_method,
                })
            }
            (amount, description, date, category, payment_method) => Err(ValidationErrors {
                amount: amount.err(),
                description: description.err(),
                date: date.err(),
                category: category.err(),
                payment_method: payment_method.err(),
            }),
        }
    }

    /// The payment method to show as selected, cash unless credit was chosen.
    pub fn selected_payment_method(&self) -> PaymentMethod {
        PaymentMethod::parse(self.payment_method.trim()).unwrap_or_default()
    }
}

fn validate_amount(amount: &str) -> Result<f64, FieldError> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err(FieldError::AmountRequired);
    }

    let amount = amount
        .parse::<f64>()
        .map_err(|_| FieldError::AmountNotNumeric)?;

    if !amount.is_finite() {
        return Err(FieldError::AmountNotNumeric);
    }

    if amount <= 0.0 {
        return Err(FieldError::AmountNotPositive);
    }

    Ok(amount)
}

fn required_text(text: &str, error: FieldError) -> Result<String, FieldError> {
    let text = text.trim();

    if text.is_empty() {
        Err(error)
    } else {
        Ok(text.to_owned())
    }
}

fn validate_date(date: &str) -> Result<time::Date, FieldError> {
    let date = date.trim();

    if date.is_empty() {
        return Err(FieldError::DateRequired);
    }

    // Only a bare date is accepted from the form, not a timestamp.
    if date.len() != 10 {
        return Err(FieldError::InvalidDate);
    }

    calendar_date::parse(date).map_err(|_| FieldError::InvalidDate)
}

fn validate_payment_method(payment_method: &str) -> Result<PaymentMethod, FieldError> {
    let payment_method = payment_method.trim();

    if payment_method.is_empty() {
        return Ok(PaymentMethod::default());
    }

    PaymentMethod::parse(payment_method).ok_or(FieldError::InvalidPaymentMethod)
}

/// How a submission ended.
#[derive(Debug, PartialEq)]
pub enum SubmissionOutcome {
    /// The expense was created.
    Succeeded(Expense),
    /// The form had errors and nothing was sent.
    Invalid {
        /// The values the user entered.
        form: ExpenseForm,
        /// The problem with each field.
        errors: ValidationErrors,
    },
    /// The expense passed validation but the expense service did not create it.
    Failed {
        /// The values the user entered.
        form: ExpenseForm,
        /// Why the request failed.
        error: Error,
    },
}

/// What the create form shows.
#[derive(Debug, Default, PartialEq)]
pub struct EditingState {
    /// The values in the form fields.
    pub form: ExpenseForm,
    /// Errors shown beside each field.
    pub errors: ValidationErrors,
    /// An error shown above the form when the expense could not be saved.
    pub submission_error: Option<Error>,
}

impl SubmissionOutcome {
    /// The form state to show after this outcome.
    ///
    /// A success resets the form, any failure keeps the user's input.
    pub fn into_editing_state(self) -> EditingState {
        match self {
            SubmissionOutcome::Succeeded(_) => EditingState::default(),
            SubmissionOutcome::Invalid { form, errors } => EditingState {
                form,
                errors,
                submission_error: None,
            },
            SubmissionOutcome::Failed { form, error } => EditingState {
                form,
                errors: ValidationErrors::default(),
                submission_error: Some(error),
            },
        }
    }
}

/// Validate `form` and, if it is valid, create the expense with `client`.
///
/// Invalid forms never reach the expense service. There are no retries.
pub async fn submit_expense(form: ExpenseForm, client: &dyn ExpenseClient) -> SubmissionOutcome {
    let new_expense = match form.validate() {
        Ok(new_expense) => new_expense,
        Err(errors) => {
            tracing::debug!("expense form is invalid: {errors:?}");
            return SubmissionOutcome::Invalid { form, errors };
        }
    };

    match client.create_expense(&new_expense).await {
        Ok(expense) => SubmissionOutcome::Succeeded(expense),
        Err(error) => {
            tracing::error!("Error adding expense: {error}");
            SubmissionOutcome::Failed { form, error }
        }
    }
}
