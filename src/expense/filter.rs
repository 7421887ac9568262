//! Filtering a collection of expenses by search text, category, payment
//! method and date range.

use std::sync::Arc;

use serde::Deserialize;
use time::Date;

use super::core::{Expense, PaymentMethod, calendar_date};

/// The active filter for the expense list.
///
/// Every field is optional and an absent field does not constrain the result.
/// Present fields are combined with a logical AND.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the description.
    pub description: Option<String>,
    /// Case-insensitive substring of the category.
    pub category_search: Option<String>,
    /// Exact, case-sensitive category.
    pub category: Option<String>,
    /// Exact payment method.
    pub payment_method: Option<PaymentMethod>,
    /// Inclusive lower bound, only used together with `end_date`.
    pub start_date: Option<Date>,
    /// Inclusive upper bound, only used together with `start_date`.
    pub end_date: Option<Date>,
}

impl FilterCriteria {
    /// Whether the criteria constrain nothing.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.category_search.is_none()
            && self.category.is_none()
            && self.payment_method.is_none()
            && self.date_range().is_none()
    }

    /// The date range, if both bounds are set.
    pub fn date_range(&self) -> Option<(Date, Date)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Whether `expense` satisfies every present criterion.
    pub fn matches(&self, expense: &Expense) -> bool {
        let description_matches = self
            .description
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&expense.description, needle));
        let category_search_matches = self
            .category_search
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&expense.category, needle));
        let category_matches = self
            .category
            .as_deref()
            .is_none_or(|category| expense.category == category);
        let payment_method_matches = self
            .payment_method
            .is_none_or(|payment_method| expense.payment_method == payment_method);
        let date_matches = self
            .date_range()
            .is_none_or(|(start, end)| start <= expense.date && expense.date <= end);

        description_matches
            && category_search_matches
            && category_matches
            && payment_method_matches
            && date_matches
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Return the expenses in `all` that match `criteria`, in their original order.
pub fn apply_filter(all: &[Expense], criteria: &FilterCriteria) -> Vec<Expense> {
    all.iter()
        .filter(|expense| criteria.matches(expense))
        .cloned()
        .collect()
}

/// A memoized [apply_filter] over a collection snapshot.
///
/// The filtered list is only recomputed when the snapshot or the criteria
/// actually change.
#[derive(Debug, Clone)]
pub struct FilteredExpenses {
    source: Arc<[Expense]>,
    criteria: FilterCriteria,
    filtered: Vec<Expense>,
}

impl FilteredExpenses {
    /// Filter `source` with `criteria`.
    pub fn new(source: Arc<[Expense]>, criteria: FilterCriteria) -> Self {
        let filtered = apply_filter(&source, &criteria);

        Self {
            source,
            criteria,
            filtered,
        }
    }

    /// Replace the collection, recomputing if it is a different snapshot.
    pub fn set_source(&mut self, source: Arc<[Expense]>) {
        if Arc::ptr_eq(&self.source, &source) {
            return;
        }

        self.source = source;
        self.recompute();
    }

    /// Replace the criteria, recomputing if they differ from the current ones.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.criteria == criteria {
            return;
        }

        self.criteria = criteria;
        self.recompute();
    }

    /// The unfiltered collection.
    pub fn source(&self) -> &[Expense] {
        &self.source
    }

    /// The criteria currently applied.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The expenses that match the criteria.
    pub fn as_slice(&self) -> &[Expense] {
        &self.filtered
    }

    fn recompute(&mut self) {
        tracing::debug!(
            "recomputing filtered expenses over {} records",
            self.source.len()
        );
        self.filtered = apply_filter(&self.source, &self.criteria);
    }
}

/// The query string of the expense list page.
///
/// Empty fields are treated as absent, and values that cannot be parsed are
/// ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct ExpenseListQuery {
    /// Description search text.
    pub description: Option<String>,
    /// Category search text.
    pub category_search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Payment method, "cash" or "credit".
    pub payment_method: Option<String>,
    /// Start date as YYYY-MM-DD.
    pub start_date: Option<String>,
    /// End date as YYYY-MM-DD.
    pub end_date: Option<String>,
    /// 1-based page number, see [ExpenseListQuery::page_index].
    pub page: Option<String>,
}

impl ExpenseListQuery {
    /// Convert the raw query parameters into [FilterCriteria].
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            description: non_empty(self.description.as_deref()),
            category_search: non_empty(self.category_search.as_deref()),
            category: non_empty(self.category.as_deref()),
            payment_method: non_empty(self.payment_method.as_deref()).and_then(|value| {
                let payment_method = PaymentMethod::parse(&value);
                if payment_method.is_none() {
                    tracing::warn!("ignoring unknown payment method filter \"{value}\"");
                }
                payment_method
            }),
            start_date: parse_date_param("start_date", self.start_date.as_deref()),
            end_date: parse_date_param("end_date", self.end_date.as_deref()),
        }
    }

    /// The requested page number.
    ///
    /// Returns `None` when the page is absent or is not a non-negative
    /// integer, so the caller falls back to its default page.
    pub fn page_index(&self) -> Option<u64> {
        let value = non_empty(self.page.as_deref())?;

        value
            .parse::<u64>()
            .inspect_err(|error| tracing::warn!("ignoring invalid page \"{value}\": {error}"))
            .ok()
    }

    /// Encode the filter fields (not the page) as a query string.
    pub fn to_filter_query_string(&self) -> String {
        let pairs = [
            ("description", self.description.as_deref()),
            ("category_search", self.category_search.as_deref()),
            ("category", self.category.as_deref()),
            ("payment_method", self.payment_method.as_deref()),
            ("start_date", self.start_date.as_deref()),
            ("end_date", self.end_date.as_deref()),
        ];
        let pairs = pairs
            .into_iter()
            .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
            .collect::<Vec<_>>();

        serde_urlencoded::to_string(pairs)
            .inspect_err(|error| tracing::error!("could not encode filter query: {error}"))
            .unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn parse_date_param(name: &str, value: Option<&str>) -> Option<Date> {
    let value = value.filter(|value| !value.is_empty())?;

    calendar_date::parse(value)
        .inspect_err(|error| tracing::warn!("ignoring invalid {name} \"{value}\": {error}"))
        .ok()
}
