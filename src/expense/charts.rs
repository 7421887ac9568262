//! Chart generation and rendering for the expense list.
//!
//! Charts summarize the filtered expenses (every page, not just the one shown):
//! - **Spending by category**: total per category, largest first
//! - **Spending by month**: total per calendar month
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

use super::{
    aggregation::{month_label, totals_by_category, totals_by_month},
    core::Expense,
};

/// The ECharts bundle served from the static directory.
pub(crate) const ECHARTS_SCRIPT: &str = "/static/echarts.6.0.0.min.js";

/// An expense chart with its HTML container ID and ECharts configuration.
pub(crate) struct ExpenseChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the charts for `expenses`.
pub(crate) fn expense_charts(expenses: &[Expense]) -> Vec<ExpenseChart> {
    vec![
        ExpenseChart {
            id: "category-chart",
            options: category_chart(expenses).to_string(),
        },
        ExpenseChart {
            id: "monthly-chart",
            options: monthly_chart(expenses).to_string(),
        },
    ]
}

/// Renders the HTML containers for the charts.
pub(crate) fn charts_view(charts: &[ExpenseChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto my-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for the charts.
pub(crate) fn charts_script(charts: &[ExpenseChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Escape `<` so text from expenses cannot close the surrounding `<script>` element.
///
/// The options only contain `<` inside JSON strings, where `\u003c` decodes to the same character.
fn escape_script_text(text: &str) -> String {
    text.replace('<', "\\u003c")
}

fn category_chart(expenses: &[Expense]) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) =
        totals_by_category(expenses).into_iter().unzip();

    Chart::new()
        .title(Title::new().text("Spending by category"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Spent").data(values))
}

fn monthly_chart(expenses: &[Expense]) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = totals_by_month(expenses)
        .into_iter()
        .map(|(month, total)| (month_label(month), total))
        .unzip();

    Chart::new()
        .title(Title::new().text("Spending by month"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Spent").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
