//! Scalar reductions over a [`crate::types::Table`].
//!
//! Every function here is total: an empty view yields a sentinel (`0`, `None`, or
//! [`NOT_AVAILABLE`]) instead of failing.

use std::collections::HashMap;

use crate::types::{Table, Transaction};

/// Sentinel label returned when a categorical statistic has no data.
pub const NOT_AVAILABLE: &str = "N/A";

/// Built-in reduction operations over a single [`Measure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows.
    Count,
    /// Sum of the measure.
    Sum,
    /// Arithmetic mean of the measure.
    Mean,
    /// Minimum value of the measure.
    Min,
    /// Maximum value of the measure.
    Max,
}

/// Numeric quantity read from each transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    UnitPrice,
    Quantity,
    /// Unit price times quantity.
    Revenue,
}

impl Measure {
    pub fn value(self, record: &Transaction) -> f64 {
        match self {
            Measure::UnitPrice => record.unit_price,
            Measure::Quantity => record.transaction_qty as f64,
            Measure::Revenue => record.revenue(),
        }
    }
}

/// Reduce a measure using a built-in [`ReduceOp`].
///
/// - `Count` always returns `Some(row_count)`.
/// - `Sum`/`Mean`/`Min`/`Max` return `None` on an empty view.
pub fn reduce(view: &Table, measure: Measure, op: ReduceOp) -> Option<f64> {
    if op == ReduceOp::Count {
        return Some(view.row_count() as f64);
    }

    let (count, acc) = view.reduce_rows((0usize, None::<f64>), |(count, acc), record| {
        let v = measure.value(record);
        let next = match (op, acc) {
            (_, None) => v,
            (ReduceOp::Sum | ReduceOp::Mean, Some(a)) => a + v,
            (ReduceOp::Min, Some(a)) => a.min(v),
            (ReduceOp::Max, Some(a)) => a.max(v),
            (ReduceOp::Count, Some(a)) => a,
        };
        (count + 1, Some(next))
    });

    match op {
        ReduceOp::Mean => acc.map(|sum| sum / count as f64),
        _ => acc,
    }
}

/// Sum of unit prices. `0.0` on an empty view.
pub fn total_sales(view: &Table) -> f64 {
    reduce(view, Measure::UnitPrice, ReduceOp::Sum).unwrap_or(0.0)
}

/// Number of transactions in the view.
pub fn transaction_count(view: &Table) -> usize {
    view.row_count()
}

/// Mean unit price, or `None` when the view is empty.
pub fn average_unit_price(view: &Table) -> Option<f64> {
    reduce(view, Measure::UnitPrice, ReduceOp::Mean)
}

/// Most frequent product type.
///
/// Ties go to the label that sorts first. Returns [`NOT_AVAILABLE`] on an empty view.
pub fn top_product_by_frequency(view: &Table) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in view {
        *counts.entry(record.product_type.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .min_by(|(a_label, a_count), (b_label, b_count)| b_count.cmp(a_count).then_with(|| a_label.cmp(b_label)))
        .map(|(label, _)| label.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        average_unit_price, reduce, top_product_by_frequency, total_sales, transaction_count, Measure, ReduceOp,
        NOT_AVAILABLE,
    };
    use crate::types::{Table, Transaction};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn sample_view() -> Table {
        Table::new(vec![
            Transaction::new(date(1), "Store A", "Bakery", "Scone", 3.0, 2),
            Transaction::new(date(2), "Store A", "Coffee", "Latte", 4.5, 1),
            Transaction::new(date(3), "Store B", "Coffee", "Latte", 4.5, 3),
        ])
    }

    #[test]
    fn reduce_count_counts_rows() {
        let view = sample_view();
        assert_eq!(reduce(&view, Measure::UnitPrice, ReduceOp::Count), Some(3.0));
        assert_eq!(reduce(&Table::default(), Measure::Quantity, ReduceOp::Count), Some(0.0));
    }

    #[test]
    fn reduce_numeric_ops() {
        let view = sample_view();
        assert_eq!(reduce(&view, Measure::UnitPrice, ReduceOp::Sum), Some(12.0));
        assert_eq!(reduce(&view, Measure::Quantity, ReduceOp::Sum), Some(6.0));
        assert_eq!(reduce(&view, Measure::Quantity, ReduceOp::Mean), Some(2.0));
        assert_eq!(reduce(&view, Measure::UnitPrice, ReduceOp::Min), Some(3.0));
        assert_eq!(reduce(&view, Measure::Revenue, ReduceOp::Max), Some(13.5));
    }

    #[test]
    fn reduce_returns_none_on_empty_view() {
        let empty = Table::default();
        for op in [ReduceOp::Sum, ReduceOp::Mean, ReduceOp::Min, ReduceOp::Max] {
            assert_eq!(reduce(&empty, Measure::UnitPrice, op), None);
        }
    }

    #[test]
    fn named_scalars_degrade_on_empty_view() {
        let empty = Table::default();
        assert_eq!(total_sales(&empty), 0.0);
        assert_eq!(transaction_count(&empty), 0);
        assert_eq!(average_unit_price(&empty), None);
        assert_eq!(top_product_by_frequency(&empty), NOT_AVAILABLE);
    }

    #[test]
    fn average_unit_price_is_the_mean() {
        assert_eq!(average_unit_price(&sample_view()), Some(4.0));
    }

    #[test]
    fn top_product_breaks_ties_by_label() {
        let view = Table::new(vec![
            Transaction::new(date(1), "Store A", "Tea", "Chai", 3.0, 1),
            Transaction::new(date(1), "Store A", "Bakery", "Biscotti", 3.0, 1),
            Transaction::new(date(1), "Store A", "Tea", "Chai", 3.0, 1),
            Transaction::new(date(1), "Store A", "Bakery", "Biscotti", 3.0, 1),
        ]);
        assert_eq!(top_product_by_frequency(&view), "Biscotti");
        assert_eq!(top_product_by_frequency(&sample_view()), "Latte");
    }
}
