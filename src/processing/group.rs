//! Grouped aggregates: per-key sums and counts, top-N rankings and the quantity pivot.
//!
//! Rankings are deterministic: value descending, then label ascending.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::InvalidRangeError;
use crate::types::{Table, Transaction};

/// Number of entries shown in a top-N ranking, validated to `3..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TopN(usize);

impl TopN {
    pub const MIN: usize = 3;
    pub const MAX: usize = 15;
    pub const DEFAULT: TopN = TopN(5);

    /// Validate `n` against `MIN..=MAX`.
    pub fn new(n: usize) -> Result<Self, InvalidRangeError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(InvalidRangeError::TopN {
                value: n,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Clamp `n` into `MIN..=MAX`.
    pub fn clamped(n: usize) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for TopN {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Summed transaction quantity by product type (rows) and store location (columns).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PivotTable {
    /// Product types, ascending.
    pub row_labels: Vec<String>,
    /// Store locations, ascending.
    pub column_labels: Vec<String>,
    /// `cells[row][column]`; combinations without transactions are `0`.
    pub cells: Vec<Vec<i64>>,
}

impl PivotTable {
    /// Cell value by labels, or `None` if either label is not part of the pivot or the
    /// grid has no cell at that position.
    pub fn get(&self, row: &str, column: &str) -> Option<i64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        self.cells.get(r)?.get(c).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Largest cell value, useful for scaling a heatmap.
    pub fn max_value(&self) -> i64 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Sum of unit price per transaction date, ascending by date.
pub fn sales_over_time(view: &Table) -> Vec<(NaiveDate, f64)> {
    let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in view {
        *sums.entry(record.transaction_date()).or_default() += record.unit_price;
    }
    sums.into_iter().collect()
}

/// Sum of unit price per store location, descending by value.
pub fn sales_by_store(view: &Table) -> Vec<(String, f64)> {
    let mut sums = sum_by(view, |r| r.store_location.as_str(), |r| r.unit_price);
    sums.sort_by(|(a_label, a), (b_label, b)| b.total_cmp(a).then_with(|| a_label.cmp(b_label)));
    sums
}

/// The `n` product types with the most transactions, descending by count.
///
/// Returns `min(n, distinct product types)` entries.
pub fn top_n_product_types(view: &Table, n: TopN) -> Vec<(String, usize)> {
    let mut counts = value_counts(view, |r| r.product_type.as_str());
    counts.truncate(n.get());
    counts
}

/// Transactions per product category, descending by count.
pub fn category_distribution(view: &Table) -> Vec<(String, usize)> {
    value_counts(view, |r| r.product_category.as_str())
}

/// Summed quantity with product types as rows and stores as columns.
pub fn quantity_pivot(view: &Table) -> PivotTable {
    let mut row_labels = BTreeSet::new();
    let mut column_labels = BTreeSet::new();
    let mut sums: HashMap<(&str, &str), i64> = HashMap::new();
    for record in view {
        row_labels.insert(record.product_type.as_str());
        column_labels.insert(record.store_location.as_str());
        *sums
            .entry((record.product_type.as_str(), record.store_location.as_str()))
            .or_default() += record.transaction_qty;
    }

    let cells = row_labels
        .iter()
        .map(|row| {
            column_labels
                .iter()
                .map(|column| sums.get(&(*row, *column)).copied().unwrap_or(0))
                .collect()
        })
        .collect();

    PivotTable {
        row_labels: row_labels.into_iter().map(str::to_string).collect(),
        column_labels: column_labels.into_iter().map(str::to_string).collect(),
        cells,
    }
}

/// Occurrences per key, descending by count, ties by label ascending.
pub fn value_counts<'a, K>(view: &'a Table, key: K) -> Vec<(String, usize)>
where
    K: Fn(&'a Transaction) -> &'a str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in view {
        *counts.entry(key(record)).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    out.sort_by(|(a_label, a), (b_label, b)| b.cmp(a).then_with(|| a_label.cmp(b_label)));
    out
}

/// Sum of `value` per key, in first-seen key order.
fn sum_by<'a, K, V>(view: &'a Table, key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&'a Transaction) -> &'a str,
    V: Fn(&Transaction) -> f64,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(String, f64)> = Vec::new();
    for record in view {
        let label = key(record);
        let slot = *index.entry(label).or_insert_with(|| {
            out.push((label.to_string(), 0.0));
            out.len() - 1
        });
        out[slot].1 += value(record);
    }
    out
}
