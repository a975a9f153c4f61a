//! Dashboard reports: every aggregate for one filter state, bundled as plain data.
//!
//! A [`DashboardReport`] is what a presentation layer consumes. It assumes nothing about how it
//! will be drawn.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::processing::{
    average_unit_price, category_distribution, quantity_pivot, sales_by_store, sales_over_time,
    top_n_product_types, top_product_by_frequency, total_sales, transaction_count, PivotTable, TopN,
    NOT_AVAILABLE,
};
use crate::types::Table;

/// How the sales time series should be drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "line chart" => Ok(Self::Line),
            "bar" | "bar chart" => Ok(Self::Bar),
            other => Err(format!("unknown chart kind '{other}' (expected line or bar)")),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => f.write_str("Line Chart"),
            ChartKind::Bar => f.write_str("Bar Chart"),
        }
    }
}

/// Presentation parameters that are not part of the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportOptions {
    pub chart_kind: ChartKind,
    pub top_n: TopN,
}

/// Non-fatal conditions attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewWarning {
    /// The filter matched no transactions; aggregates hold their "no data" values.
    EmptyView,
}

impl ViewWarning {
    /// Warning for `view`, if any.
    pub fn for_view(view: &Table) -> Option<Self> {
        view.is_empty().then_some(ViewWarning::EmptyView)
    }
}

impl fmt::Display for ViewWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewWarning::EmptyView => f.write_str("no transactions match the current filters"),
        }
    }
}

/// The four headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_sales: f64,
    pub transaction_count: usize,
    /// `None` when there is no data to average.
    pub average_unit_price: Option<f64>,
    /// Most frequent product type, or `"N/A"`.
    pub top_product: String,
}

impl KeyMetrics {
    pub fn compute(view: &Table) -> Self {
        Self {
            total_sales: total_sales(view),
            transaction_count: transaction_count(view),
            average_unit_price: average_unit_price(view),
            top_product: top_product_by_frequency(view),
        }
    }

    /// `(label, formatted value)` pairs in display order.
    pub fn display_rows(&self) -> [(&'static str, String); 4] {
        [
            ("Total Sales", format_currency(self.total_sales)),
            ("Total Transactions", self.transaction_count.to_string()),
            (
                "Avg. Unit Price",
                self.average_unit_price
                    .map(format_currency)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            ),
            ("Top Product", self.top_product.clone()),
        ]
    }
}

/// Sales over time, tagged with the chosen rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub kind: ChartKind,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Every aggregate for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub metrics: KeyMetrics,
    pub sales_over_time: TimeSeries,
    pub sales_by_store: Vec<(String, f64)>,
    pub top_n: TopN,
    pub top_product_types: Vec<(String, usize)>,
    pub category_distribution: Vec<(String, usize)>,
    pub quantity_pivot: PivotTable,
    pub row_count: usize,
    pub warning: Option<ViewWarning>,
}

impl DashboardReport {
    /// Compute every aggregate over `view`.
    pub fn compute(view: &Table, options: &ReportOptions) -> Self {
        let warning = ViewWarning::for_view(view);
        if let Some(w) = warning {
            tracing::warn!(warning = %w, "dashboard view is empty");
        }
        Self {
            metrics: KeyMetrics::compute(view),
            sales_over_time: TimeSeries {
                kind: options.chart_kind,
                points: sales_over_time(view),
            },
            sales_by_store: sales_by_store(view),
            top_n: options.top_n,
            top_product_types: top_n_product_types(view, options.top_n),
            category_distribution: category_distribution(view),
            quantity_pivot: quantity_pivot(view),
            row_count: view.row_count(),
            warning,
        }
    }
}

/// Format a dollar amount as `$1,234.56`; negatives as `-$1,234.56`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
