//! Format-independent row assembly.
//!
//! Each source format turns its native cells into [`Cell`]s; this module maps header names to
//! [`Column`]s and coerces cells into a typed [`Transaction`].

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{DataSourceError, DataSourceResult};
use crate::types::{Column, Transaction};

/// A raw cell value as read from a source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell<'a> {
    Empty,
    Text(Cow<'a, str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl Cell<'_> {
    fn raw(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::DateTime(dt) => dt.to_string(),
            Cell::Time(t) => t.to_string(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Maps every known [`Column`] to its position in the source header, if present.
#[derive(Debug, Clone)]
pub(crate) struct HeaderProjection {
    positions: Vec<(Column, usize)>,
}

impl HeaderProjection {
    /// Build a projection from header names.
    ///
    /// Fails with [`DataSourceError::SchemaMismatch`] if any required column is absent. Derived
    /// columns in the source are ignored; they are recomputed from the transaction date.
    pub(crate) fn from_headers<S: AsRef<str>>(headers: &[S]) -> DataSourceResult<Self> {
        let mut positions = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_name(header.as_ref()) {
                if column.is_derived() || positions.iter().any(|(c, _)| *c == column) {
                    continue;
                }
                positions.push((column, idx));
            }
        }

        for required in Column::REQUIRED {
            if !positions.iter().any(|(c, _)| *c == required) {
                return Err(DataSourceError::SchemaMismatch {
                    message: format!(
                        "missing required column '{}'. headers={:?}",
                        required.name(),
                        headers.iter().map(|h| h.as_ref()).collect::<Vec<_>>()
                    ),
                });
            }
        }

        Ok(Self { positions })
    }

    /// Position of `column` in the source header.
    pub(crate) fn position(&self, column: Column) -> Option<usize> {
        self.positions
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, idx)| *idx)
    }
}

/// Coerce one source row into a [`Transaction`].
///
/// `cell` returns the raw cell for a projected column, or `None` when the source has no such
/// column. `row` is the 1-based row number reported in errors; `label` prefixes column names
/// (e.g. with a sheet name).
pub(crate) fn build_transaction<'a, F>(
    row: usize,
    label: Option<&str>,
    mut cell: F,
) -> DataSourceResult<Transaction>
where
    F: FnMut(Column) -> Option<Cell<'a>>,
{
    let ctx = RowContext { row, label };

    let date_cell = cell(Column::TransactionDate).unwrap_or(Cell::Empty);
    let (date, time_of_day) = ctx.required(Column::TransactionDate, &date_cell, parse_date)?;
    let mut required_cell = |column| cell(column).unwrap_or(Cell::Empty);
    let store = ctx.required(Column::StoreLocation, &required_cell(Column::StoreLocation), parse_text)?;
    let category = ctx.required(Column::ProductCategory, &required_cell(Column::ProductCategory), parse_text)?;
    let product_type = ctx.required(Column::ProductType, &required_cell(Column::ProductType), parse_text)?;
    let unit_price = ctx.required(Column::UnitPrice, &required_cell(Column::UnitPrice), parse_f64)?;
    let qty = ctx.required(Column::TransactionQty, &required_cell(Column::TransactionQty), parse_i64)?;

    let mut out = Transaction::new(date, store, category, product_type, unit_price, qty);

    match cell(Column::TransactionTime) {
        Some(c) => {
            if let Some(time) = ctx.optional(Column::TransactionTime, &c, parse_time)? {
                out = out.with_time(time);
            }
        }
        None => {
            // No dedicated time column: keep the time-of-day carried by the date cell, if any.
            if let Some(time) = time_of_day {
                out = out.with_time(time);
            }
        }
    }
    if let Some(c) = cell(Column::TransactionId) {
        if let Some(id) = ctx.optional(Column::TransactionId, &c, parse_i64)? {
            out = out.with_transaction_id(id);
        }
    }
    if let Some(c) = cell(Column::StoreId) {
        if let Some(id) = ctx.optional(Column::StoreId, &c, parse_i64)? {
            out = out.with_store_id(id);
        }
    }
    if let Some(c) = cell(Column::ProductId) {
        if let Some(id) = ctx.optional(Column::ProductId, &c, parse_i64)? {
            out = out.with_product_id(id);
        }
    }
    if let Some(c) = cell(Column::ProductDetail) {
        if let Some(detail) = ctx.optional(Column::ProductDetail, &c, parse_text)? {
            out = out.with_product_detail(detail);
        }
    }

    Ok(out)
}

struct RowContext<'l> {
    row: usize,
    label: Option<&'l str>,
}

impl RowContext<'_> {
    fn column_label(&self, column: Column) -> String {
        match self.label {
            Some(label) => format!("{label}:{}", column.name()),
            None => column.name().to_string(),
        }
    }

    fn error(&self, column: Column, cell: &Cell<'_>, message: impl Into<String>) -> DataSourceError {
        DataSourceError::ParseError {
            row: self.row,
            column: self.column_label(column),
            raw: cell.raw(),
            message: message.into(),
        }
    }

    fn required<T>(
        &self,
        column: Column,
        cell: &Cell<'_>,
        parse: fn(&Cell<'_>) -> Result<T, String>,
    ) -> DataSourceResult<T> {
        if cell.is_empty() {
            return Err(self.error(column, cell, "missing value in required column"));
        }
        parse(cell).map_err(|message| self.error(column, cell, message))
    }

    fn optional<T>(
        &self,
        column: Column,
        cell: &Cell<'_>,
        parse: fn(&Cell<'_>) -> Result<T, String>,
    ) -> DataSourceResult<Option<T>> {
        if cell.is_empty() {
            return Ok(None);
        }
        parse(cell)
            .map(Some)
            .map_err(|message| self.error(column, cell, message))
    }
}

fn parse_text(cell: &Cell<'_>) -> Result<String, String> {
    match cell {
        Cell::Text(s) => Ok(s.trim().to_owned()),
        Cell::Int(i) => Ok(i.to_string()),
        Cell::Float(f) => Ok(f.to_string()),
        Cell::Bool(b) => Ok(b.to_string()),
        other => Ok(other.raw()),
    }
}

fn parse_i64(cell: &Cell<'_>) -> Result<i64, String> {
    match cell {
        Cell::Int(i) => Ok(*i),
        Cell::Float(f) if f.fract() == 0.0 => {
            // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
            if *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                Ok(*f as i64)
            } else {
                Err(format!("integer out of range ({f})"))
            }
        }
        Cell::Float(_) => Err("expected integer (got non-integer float)".to_string()),
        Cell::Text(s) => s.trim().parse::<i64>().map_err(|e| e.to_string()),
        _ => Err("expected integer".to_string()),
    }
}

fn parse_f64(cell: &Cell<'_>) -> Result<f64, String> {
    match cell {
        Cell::Float(f) => Ok(*f),
        Cell::Int(i) => Ok(*i as f64),
        Cell::Text(s) => {
            let v = s.trim().parse::<f64>().map_err(|e| e.to_string())?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err("expected a finite number".to_string())
            }
        }
        _ => Err("expected number".to_string()),
    }
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parse a date cell into its calendar date plus a time-of-day when one is present.
fn parse_date(cell: &Cell<'_>) -> Result<(NaiveDate, Option<NaiveTime>), String> {
    match cell {
        Cell::DateTime(dt) => Ok(split_datetime(*dt)),
        Cell::Text(s) => parse_date_str(s.trim()),
        _ => Err("expected date (YYYY-MM-DD)".to_string()),
    }
}

pub(crate) fn parse_date_str(s: &str) -> Result<(NaiveDate, Option<NaiveTime>), String> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok((d, None));
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(split_datetime(dt));
        }
    }
    Err("expected date (YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or MM/DD/YYYY)".to_string())
}

fn split_datetime(dt: NaiveDateTime) -> (NaiveDate, Option<NaiveTime>) {
    let time = dt.time();
    (dt.date(), (time != NaiveTime::MIN).then_some(time))
}

fn parse_time(cell: &Cell<'_>) -> Result<NaiveTime, String> {
    match cell {
        Cell::Time(t) => Ok(*t),
        Cell::DateTime(dt) => Ok(dt.time()),
        Cell::Float(f) if (0.0..1.0).contains(f) => {
            // Spreadsheet time: fraction of a day.
            let secs = (f * 86_400.0).round() as u32;
            NaiveTime::from_num_seconds_from_midnight_opt(secs.min(86_399), 0)
                .ok_or_else(|| "time out of range".to_string())
        }
        Cell::Text(s) => {
            let s = s.trim();
            NaiveTime::parse_from_str(s, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                .map_err(|_| "expected time (HH:MM:SS)".to_string())
        }
        _ => Err("expected time (HH:MM:SS)".to_string()),
    }
}
