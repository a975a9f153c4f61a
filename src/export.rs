//! CSV export of a filtered view.
//!
//! Output has a header row, no index column, and the fixed column order of [`Column::ALL`].
//! Absent optional values become empty cells. The output can be loaded back with
//! [`crate::ingestion::csv::load_csv_from_bytes`].

use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::types::{Column, Table, Transaction};

/// File name offered for downloads of the current view.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "filtered_data.csv";

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Serialize `view` to CSV bytes.
pub fn to_csv(view: &Table) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(buf)
}

/// Write `view` as CSV to `writer`.
pub fn write_csv<W: Write>(view: &Table, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(Column::ALL.iter().map(|c| c.name()))?;
    for record in view {
        wtr.write_record(Column::ALL.iter().map(|&c| cell_text(record, c)))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `view` as CSV to a file at `path`, replacing any existing file.
pub fn write_csv_to_path(view: &Table, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(view, std::io::BufWriter::new(file))
}

fn cell_text(record: &Transaction, column: Column) -> String {
    fn opt<T: ToString>(v: Option<T>) -> String {
        v.map(|v| v.to_string()).unwrap_or_default()
    }

    match column {
        Column::TransactionId => opt(record.transaction_id),
        Column::TransactionDate => record.transaction_date().format(DATE_FORMAT).to_string(),
        Column::TransactionTime => opt(record.transaction_time.map(|t| t.format(TIME_FORMAT))),
        Column::TransactionQty => record.transaction_qty.to_string(),
        Column::StoreId => opt(record.store_id),
        Column::StoreLocation => record.store_location.clone(),
        Column::ProductId => opt(record.product_id),
        Column::UnitPrice => record.unit_price.to_string(),
        Column::ProductCategory => record.product_category.clone(),
        Column::ProductType => record.product_type.clone(),
        Column::ProductDetail => record.product_detail.clone().unwrap_or_default(),
        Column::Day => record.day().to_string(),
        Column::Month => record.month().to_string(),
        Column::Year => record.year().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::to_csv;
    use crate::types::{Table, Transaction};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn writes_header_and_rows_in_column_order() {
        let view = Table::new(vec![Transaction::new(
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            "Store B",
            "Coffee",
            "Latte",
            4.5,
            2,
        )
        .with_time(NaiveTime::from_hms_opt(8, 30, 0).unwrap())
        .with_transaction_id(17)]);

        let out = String::from_utf8(to_csv(&view).unwrap()).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some(
                "transaction_id,transaction_date,transaction_time,transaction_qty,store_id,store_location,\
                 product_id,unit_price,product_category,product_type,product_detail,day,month,year"
            )
        );
        assert_eq!(
            lines.next(),
            Some("17,2025-01-02,08:30:00,2,,Store B,,4.5,Coffee,Latte,,2,January,2025")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn empty_view_exports_header_only() {
        let out = String::from_utf8(to_csv(&Table::default()).unwrap()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("transaction_id,"));
    }
}
