//! CSV loading implementation.

use std::borrow::Cow;
use std::path::Path;

use crate::error::DataSourceResult;
use crate::types::{Column, Table};

use super::row::{build_transaction, Cell, HeaderProjection};

/// Load a CSV file into an in-memory [`Table`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all required transaction columns (order can differ).
/// - Each value is coerced to its column's type; empty optional cells stay empty.
pub fn load_csv_from_path(path: impl AsRef<Path>) -> DataSourceResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> DataSourceResult<Table> {
    let headers = rdr.headers()?.clone();
    let header_names: Vec<&str> = headers.iter().collect();
    let projection = HeaderProjection::from_headers(&header_names)?;

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let transaction = build_transaction(user_row, None, |column: Column| {
            projection
                .position(column)
                .map(|idx| match record.get(idx) {
                    Some(raw) => Cell::Text(Cow::Borrowed(raw)),
                    None => Cell::Empty,
                })
        })?;
        records.push(transaction);
    }

    Ok(Table::new(records))
}

/// Load CSV data from an in-memory byte slice (e.g. a previous export).
pub fn load_csv_from_bytes(input: &[u8]) -> DataSourceResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);
    load_csv_from_reader(&mut rdr)
}
