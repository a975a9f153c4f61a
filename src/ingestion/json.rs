//! JSON loading implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"store_location":"Astoria", ...}, ...]`
//! - Newline-delimited JSON (NDJSON): one object per line
//!
//! Object keys are matched against transaction column names after trimming whitespace; other
//! keys are ignored. When two keys name the same column, the first one wins.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{DataSourceError, DataSourceResult};
use crate::types::{Column, Table};

use super::row::{build_transaction, Cell, HeaderProjection};

/// Load JSON into an in-memory [`Table`].
pub fn load_json_from_path(path: impl AsRef<Path>) -> DataSourceResult<Table> {
    let text = fs::read_to_string(path)?;
    load_json_from_str(&text)
}

/// Load JSON from an in-memory string into a [`Table`].
pub fn load_json_from_str(input: &str) -> DataSourceResult<Table> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DataSourceError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => load_json_values(&items),
            serde_json::Value::Object(_) => load_json_values(std::slice::from_ref(&v)),
            _ => Err(DataSourceError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for line in trimmed.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            values.push(serde_json::from_str::<serde_json::Value>(line)?);
        }
        load_json_values(&values)
    }
}

fn load_json_values(values: &[serde_json::Value]) -> DataSourceResult<Table> {
    let Some(first) = values.first() else {
        return Ok(Table::default());
    };
    let serde_json::Value::Object(first) = first else {
        return Err(DataSourceError::SchemaMismatch {
            message: "row 1: expected a json object".to_string(),
        });
    };
    // The first object acts as the header row.
    let keys: Vec<&str> = first.keys().map(String::as_str).collect();
    HeaderProjection::from_headers(&keys)?;

    let mut records = Vec::with_capacity(values.len());
    for (idx0, value) in values.iter().enumerate() {
        let row = idx0 + 1;
        let serde_json::Value::Object(obj) = value else {
            return Err(DataSourceError::SchemaMismatch {
                message: format!("row {row}: expected a json object"),
            });
        };
        let by_column = columns_of(obj);
        let transaction = build_transaction(row, None, |column: Column| {
            let cell = match by_column.get(&column) {
                None if Column::REQUIRED.contains(&column) => Cell::Empty,
                None => return None,
                Some(v) => json_to_cell(v),
            };
            Some(cell)
        })?;
        records.push(transaction);
    }

    Ok(Table::new(records))
}

fn columns_of(obj: &serde_json::Map<String, serde_json::Value>) -> HashMap<Column, &serde_json::Value> {
    let mut by_column = HashMap::with_capacity(obj.len());
    for (key, value) in obj {
        if let Some(column) = Column::from_name(key) {
            by_column.entry(column).or_insert(value);
        }
    }
    by_column
}

fn json_to_cell(v: &serde_json::Value) -> Cell<'_> {
    match v {
        serde_json::Value::Null => Cell::Empty,
        serde_json::Value::Bool(b) => Cell::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Empty),
        },
        serde_json::Value::String(s) => Cell::Text(Cow::Borrowed(s.as_str())),
        other => Cell::Text(Cow::Owned(other.to_string())),
    }
}
