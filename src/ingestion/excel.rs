#![cfg(feature = "excel")]

use std::borrow::Cow;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use crate::error::{DataSourceError, DataSourceResult};
use crate::types::{Column, Table, Transaction};

use super::row::{build_transaction, parse_date_str, Cell, HeaderProjection};

/// Load an Excel document (`.xlsx`, `.xls`, `.ods`, etc.) into an in-memory [`Table`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Validates that all required transaction columns exist as headers
/// - Reads remaining rows and coerces cells into typed [`Transaction`]s
pub fn load_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> DataSourceResult<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| DataSourceError::SchemaMismatch {
                message: "workbook has no sheets".to_string(),
            })?,
    };
    let range = workbook.worksheet_range(&sheet)?;
    Ok(Table::new(load_sheet_range(&sheet, &range)?))
}

/// Load multiple sheets from an Excel workbook and concatenate all rows into one [`Table`].
///
/// - If `sheet_names` is `None`, loads **all sheets** in workbook order.
/// - If `sheet_names` is `Some(&[...])`, loads only those sheets (in the provided order).
///
/// Every sheet must carry the required transaction columns.
pub fn load_excel_workbook_from_path(
    path: impl AsRef<Path>,
    sheet_names: Option<&[&str]>,
) -> DataSourceResult<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheets: Vec<String> = match sheet_names {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => workbook.sheet_names().to_vec(),
    };
    if sheets.is_empty() {
        return Err(DataSourceError::SchemaMismatch {
            message: "workbook has no sheets".to_string(),
        });
    }

    let mut all_rows: Vec<Transaction> = Vec::new();
    for sheet in sheets {
        let range = workbook.worksheet_range(&sheet)?;
        let mut sheet_rows = load_sheet_range(&sheet, &range)?;
        all_rows.append(&mut sheet_rows);
    }

    Ok(Table::new(all_rows))
}

fn load_sheet_range(sheet: &str, range: &calamine::Range<Data>) -> DataSourceResult<Vec<Transaction>> {
    let (header_row_idx, projection) =
        build_header_projection(range).map_err(|e| wrap_schema_err_with_sheet(sheet, e))?;

    let mut rows: Vec<Transaction> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if idx0 <= header_row_idx {
            continue;
        }
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }

        // Report 1-based row number (Excel-like).
        let user_row = idx0 + 1;
        let transaction = build_transaction(user_row, Some(sheet), |column: Column| {
            projection
                .position(column)
                .map(|idx| convert_cell(row.get(idx).unwrap_or(&Data::Empty)))
        })?;
        rows.push(transaction);
    }

    Ok(rows)
}

fn wrap_schema_err_with_sheet(sheet: &str, err: DataSourceError) -> DataSourceError {
    match err {
        DataSourceError::SchemaMismatch { message } => DataSourceError::SchemaMismatch {
            message: format!("sheet '{sheet}': {message}"),
        },
        other => other,
    }
}

fn build_header_projection(range: &calamine::Range<Data>) -> DataSourceResult<(usize, HeaderProjection)> {
    for (idx0, row) in range.rows().enumerate() {
        let non_empty = row.iter().any(|c| !matches!(c, Data::Empty));
        if non_empty {
            let header_cells: Vec<String> = row.iter().map(cell_to_header_string).collect();
            let projection = HeaderProjection::from_headers(&header_cells)?;
            return Ok((idx0, projection));
        }
    }

    Err(DataSourceError::SchemaMismatch {
        message: "sheet has no non-empty rows (no header row found)".to_string(),
    })
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> Cell<'_> {
    match c {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(Cow::Borrowed(s.as_str())),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(edt) => match edt.as_datetime() {
            // Pure time cells come back anchored on the spreadsheet epoch.
            Some(dt) if edt.as_f64() < 1.0 => Cell::Time(dt.time()),
            Some(dt) => Cell::DateTime(dt),
            None => Cell::Text(Cow::Owned(c.to_string())),
        },
        Data::DateTimeIso(s) => match parse_date_str(s) {
            Ok((date, time)) => Cell::DateTime(date.and_time(time.unwrap_or_default())),
            Err(_) => Cell::Text(Cow::Borrowed(s.as_str())),
        },
        Data::DurationIso(s) => Cell::Text(Cow::Borrowed(s.as_str())),
        Data::Error(e) => Cell::Text(Cow::Owned(format!("{e:?}"))),
    }
}
