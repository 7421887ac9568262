//! Expense totals for charting.

use std::collections::{BTreeMap, HashMap};

use time::{Date, Month};

use super::core::Expense;

/// Sums expense amounts by category.
///
/// # Returns
/// Pairs of (category, total) sorted by total, largest first. Ties are broken
/// by category name so the order is stable.
pub(crate) fn totals_by_category(expenses: &[Expense]) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut totals = totals
        .into_iter()
        .map(|(category, total)| (category.to_owned(), total))
        .collect::<Vec<_>>();
    totals.sort_by(|(a_name, a_total), (b_name, b_total)| {
        b_total.total_cmp(a_total).then_with(|| a_name.cmp(b_name))
    });

    totals
}

/// Sums expense amounts by calendar month.
///
/// # Returns
/// Pairs of (first day of month, total) in chronological order.
pub(crate) fn totals_by_month(expenses: &[Expense]) -> Vec<(Date, f64)> {
    let mut totals: BTreeMap<Date, f64> = BTreeMap::new();

    for expense in expenses {
        let month = first_of_month(expense.date);
        *totals.entry(month).or_insert(0.0) += expense.amount;
    }

    totals.into_iter().collect()
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1)
        .inspect_err(|error| tracing::error!("could not get first day of month for {date}: {error}"))
        .unwrap_or(date)
}

/// Formats a month as a short label, e.g. "Feb 2024".
pub(crate) fn month_label(month: Date) -> String {
    let name = match month.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{name} {}", month.year())
}
