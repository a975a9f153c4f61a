//! Core data model types.
//!
//! Loading produces an immutable [`Table`] of typed [`Transaction`] records. Every filtered view
//! is itself a [`Table`], so the same aggregation functions work on the full dataset and on any
//! subset of it.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// A column of the transaction table, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    TransactionId,
    TransactionDate,
    TransactionTime,
    TransactionQty,
    StoreId,
    StoreLocation,
    ProductId,
    UnitPrice,
    ProductCategory,
    ProductType,
    ProductDetail,
    Day,
    Month,
    Year,
}

impl Column {
    /// Every column, in the order used for CSV export.
    pub const ALL: [Column; 14] = [
        Column::TransactionId,
        Column::TransactionDate,
        Column::TransactionTime,
        Column::TransactionQty,
        Column::StoreId,
        Column::StoreLocation,
        Column::ProductId,
        Column::UnitPrice,
        Column::ProductCategory,
        Column::ProductType,
        Column::ProductDetail,
        Column::Day,
        Column::Month,
        Column::Year,
    ];

    /// Columns a source must provide; loading fails fast if any is absent.
    pub const REQUIRED: [Column; 6] = [
        Column::TransactionDate,
        Column::StoreLocation,
        Column::ProductCategory,
        Column::ProductType,
        Column::UnitPrice,
        Column::TransactionQty,
    ];

    /// Columns read when present and left empty otherwise.
    pub const OPTIONAL: [Column; 5] = [
        Column::TransactionId,
        Column::TransactionTime,
        Column::StoreId,
        Column::ProductId,
        Column::ProductDetail,
    ];

    /// Header name of the column.
    pub fn name(self) -> &'static str {
        match self {
            Column::TransactionId => "transaction_id",
            Column::TransactionDate => "transaction_date",
            Column::TransactionTime => "transaction_time",
            Column::TransactionQty => "transaction_qty",
            Column::StoreId => "store_id",
            Column::StoreLocation => "store_location",
            Column::ProductId => "product_id",
            Column::UnitPrice => "unit_price",
            Column::ProductCategory => "product_category",
            Column::ProductType => "product_type",
            Column::ProductDetail => "product_detail",
            Column::Day => "day",
            Column::Month => "month",
            Column::Year => "year",
        }
    }

    /// Look a column up by header name (exact, after trimming).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Whether the column is computed from the transaction date rather than read.
    pub fn is_derived(self) -> bool {
        matches!(self, Column::Day | Column::Month | Column::Year)
    }
}

/// Calendar fields derived from the transaction date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct CalendarFields {
    day: u32,
    month: String,
    year: i32,
}

impl CalendarFields {
    fn from_date(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.format("%B").to_string(),
            year: date.year(),
        }
    }
}

/// One point-of-sale transaction.
///
/// The transaction date is private so that the derived calendar fields ([`Self::day`],
/// [`Self::month`], [`Self::year`]) can never drift from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub transaction_id: Option<i64>,
    transaction_date: NaiveDate,
    pub transaction_time: Option<NaiveTime>,
    pub transaction_qty: i64,
    pub store_id: Option<i64>,
    pub store_location: String,
    pub product_id: Option<i64>,
    pub unit_price: f64,
    pub product_category: String,
    pub product_type: String,
    pub product_detail: Option<String>,
    #[serde(flatten)]
    calendar: CalendarFields,
}

impl Transaction {
    /// Create a transaction from its required fields. Optional fields start empty.
    pub fn new(
        transaction_date: NaiveDate,
        store_location: impl Into<String>,
        product_category: impl Into<String>,
        product_type: impl Into<String>,
        unit_price: f64,
        transaction_qty: i64,
    ) -> Self {
        Self {
            transaction_id: None,
            transaction_date,
            transaction_time: None,
            transaction_qty,
            store_id: None,
            store_location: store_location.into(),
            product_id: None,
            unit_price,
            product_category: product_category.into(),
            product_type: product_type.into(),
            product_detail: None,
            calendar: CalendarFields::from_date(transaction_date),
        }
    }

    pub fn with_transaction_id(mut self, id: i64) -> Self {
        self.transaction_id = Some(id);
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.transaction_time = Some(time);
        self
    }

    pub fn with_store_id(mut self, id: i64) -> Self {
        self.store_id = Some(id);
        self
    }

    pub fn with_product_id(mut self, id: i64) -> Self {
        self.product_id = Some(id);
        self
    }

    pub fn with_product_detail(mut self, detail: impl Into<String>) -> Self {
        self.product_detail = Some(detail.into());
        self
    }

    /// Calendar date of the transaction.
    pub fn transaction_date(&self) -> NaiveDate {
        self.transaction_date
    }

    /// Date and time of the transaction; midnight when no time was recorded.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.transaction_date
            .and_time(self.transaction_time.unwrap_or(NaiveTime::MIN))
    }

    /// Day of month (1-31).
    pub fn day(&self) -> u32 {
        self.calendar.day
    }

    /// English month name, e.g. `"January"`.
    pub fn month(&self) -> &str {
        &self.calendar.month
    }

    pub fn year(&self) -> i32 {
        self.calendar.year
    }

    /// Unit price times quantity.
    pub fn revenue(&self) -> f64 {
        self.unit_price * self.transaction_qty as f64
    }
}

/// In-memory transaction table.
///
/// Tables are never mutated after construction; filtering produces a new table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Records in source order.
    pub records: Vec<Transaction>,
}

impl Table {
    /// Create a table from records.
    pub fn new(records: Vec<Transaction>) -> Self {
        Self { records }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.records.iter()
    }

    /// Create a new table containing only records that match `predicate`.
    ///
    /// Source order is preserved.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Transaction) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect();
        Self { records }
    }

    /// Reduce (fold) all records into an accumulator value.
    pub fn reduce_rows<A, F>(&self, init: A, reducer: F) -> A
    where
        F: FnMut(A, &Transaction) -> A,
    {
        self.records.iter().fold(init, reducer)
    }

    /// Distinct values of a text column in first-seen order.
    ///
    /// Returns an empty list for non-categorical columns.
    pub fn distinct_values(&self, column: Column) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for record in &self.records {
            let value = match column {
                Column::StoreLocation => record.store_location.as_str(),
                Column::ProductCategory => record.product_category.as_str(),
                Column::ProductType => record.product_type.as_str(),
                Column::ProductDetail => match record.product_detail.as_deref() {
                    Some(detail) => detail,
                    None => continue,
                },
                Column::Month => record.month(),
                _ => return Vec::new(),
            };
            if seen.insert(value) {
                out.push(value.to_string());
            }
        }
        out
    }

    /// Earliest and latest transaction dates, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.reduce_rows(None, |acc, record| {
            let date = record.transaction_date();
            Some(match acc {
                None => (date, date),
                Some((lo, hi)) => (std::cmp::min(lo, date), std::cmp::max(hi, date)),
            })
        })
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Transaction> for Table {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, Table, Transaction};
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn derived_calendar_fields_follow_the_date() {
        let t = Transaction::new(date(2023, 3, 14), "Lower Manhattan", "Coffee", "Latte", 3.5, 2);
        assert_eq!(t.day(), 14);
        assert_eq!(t.month(), "March");
        assert_eq!(t.year(), 2023);
    }

    #[test]
    fn timestamp_defaults_to_midnight() {
        let t = Transaction::new(date(2023, 1, 1), "A", "Coffee", "Latte", 3.0, 1);
        assert_eq!(t.timestamp(), date(2023, 1, 1).and_hms_opt(0, 0, 0).unwrap());

        let t = t.with_time(NaiveTime::from_hms_opt(7, 6, 11).unwrap());
        assert_eq!(t.timestamp(), date(2023, 1, 1).and_hms_opt(7, 6, 11).unwrap());
    }

    #[test]
    fn column_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_name(column.name()), Some(column));
        }
        assert_eq!(Column::from_name(" unit_price "), Some(Column::UnitPrice));
        assert_eq!(Column::from_name("missing"), None);
        assert!(Column::Month.is_derived());
        assert!(!Column::UnitPrice.is_derived());
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let table: Table = vec![
            Transaction::new(date(2023, 1, 2), "Hell's Kitchen", "Coffee", "Latte", 3.0, 1),
            Transaction::new(date(2023, 1, 1), "Astoria", "Tea", "Chai", 2.5, 1),
            Transaction::new(date(2023, 1, 3), "Hell's Kitchen", "Bakery", "Scone", 3.25, 1),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            table.distinct_values(Column::StoreLocation),
            vec!["Hell's Kitchen".to_string(), "Astoria".to_string()]
        );
        assert!(table.distinct_values(Column::UnitPrice).is_empty());
        assert_eq!(table.date_bounds(), Some((date(2023, 1, 1), date(2023, 1, 3))));
        assert_eq!(Table::default().date_bounds(), None);
    }
}
