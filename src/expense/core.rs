//! Defines the core data models for expenses and their wire format.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

// ============================================================================
// MODELS
// ============================================================================

/// The opaque identifier the persistence service assigns to an expense.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(String);

impl ExpenseId {
    /// Wrap an identifier issued by the persistence service.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an expense was paid for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid with cash. The default for new expenses.
    #[default]
    Cash,
    /// Paid with a credit card.
    Credit,
}

impl PaymentMethod {
    /// All payment methods in display order.
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::Credit];

    /// The value used in query strings, forms and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Credit => "credit",
        }
    }

    /// The human readable label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Credit => "Credit",
        }
    }

    /// Parse the lowercase wire value, returning `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "cash" => Some(PaymentMethod::Cash),
            "credit" => Some(PaymentMethod::Credit),
            _ => None,
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An expense record as stored by the persistence service.
///
/// Expenses are created once through the create form and never edited here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID assigned by the persistence service.
    #[serde(rename = "_id", alias = "id")]
    pub id: ExpenseId,
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// What the money was spent on.
    pub description: String,
    /// The calendar date of the expense.
    #[serde(with = "calendar_date")]
    pub date: Date,
    /// A free text category, e.g. "food".
    pub category: String,
    /// How the expense was paid for.
    pub payment_method: PaymentMethod,
}

/// The payload for creating an expense, produced by validating the create form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// How much was spent. Always greater than zero.
    pub amount: f64,
    /// What the money was spent on.
    pub description: String,
    /// The calendar date of the expense.
    #[serde(with = "calendar_date")]
    pub date: Date,
    /// A free text category, e.g. "food".
    pub category: String,
    /// How the expense was paid for.
    pub payment_method: PaymentMethod,
}

/// Serde helpers for calendar dates.
///
/// Dates are written as `YYYY-MM-DD`. When reading, ISO 8601 timestamps such
/// as `2024-02-15T00:00:00.000Z` are accepted and truncated to their date
/// part, so time-of-day never affects date comparisons.
pub(crate) mod calendar_date {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
        format_description!("[year]-[month]-[day]");

    /// Parse the leading `YYYY-MM-DD` of `text`.
    pub(crate) fn parse(text: &str) -> Result<Date, time::error::Parse> {
        let date_part = text.trim().get(..10).unwrap_or(text);
        Date::parse(date_part, DATE_FORMAT)
    }

    pub(crate) fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(|error| D::Error::custom(format!("invalid date \"{text}\": {error}")))
    }
}
