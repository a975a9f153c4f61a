#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{NaiveDate, NaiveTime};
use retail_sales_dashboard::ingestion::excel::{load_excel_from_path, load_excel_workbook_from_path};
use retail_sales_dashboard::ingestion::{load_from_path, ExcelSheetSelection, LoadOptions};
use retail_sales_dashboard::DataSourceError;

const HEADERS: [&str; 7] = [
    "transaction_date",
    "transaction_time",
    "store_location",
    "product_category",
    "product_type",
    "unit_price",
    "transaction_qty",
];

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("retail-sales-dashboard-{name}-{nanos}.xlsx"))
}

struct SheetRow<'a> {
    date: &'a str,
    time_fraction: f64,
    store: &'a str,
    category: &'a str,
    product_type: &'a str,
    price: f64,
    qty: f64,
}

fn write_sheet(ws: &mut rust_xlsxwriter::Worksheet, name: &str, headers: &[&str], rows: &[SheetRow<'_>]) {
    ws.set_name(name).unwrap();
    for (col, header) in headers.iter().enumerate() {
        ws.write_string(0, col as u16, *header).unwrap();
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        ws.write_string(r, 0, row.date).unwrap();
        ws.write_number(r, 1, row.time_fraction).unwrap();
        ws.write_string(r, 2, row.store).unwrap();
        ws.write_string(r, 3, row.category).unwrap();
        ws.write_string(r, 4, row.product_type).unwrap();
        if headers.len() > 5 {
            ws.write_number(r, 5, row.price).unwrap();
        }
        if headers.len() > 6 {
            ws.write_number(r, 6, row.qty).unwrap();
        }
    }
}

fn first_sheet_rows() -> Vec<SheetRow<'static>> {
    vec![
        SheetRow {
            date: "2023-01-01",
            time_fraction: 0.5,
            store: "Astoria",
            category: "Coffee",
            product_type: "Drip coffee",
            price: 2.0,
            qty: 1.0,
        },
        SheetRow {
            date: "2023-01-02",
            time_fraction: 0.25,
            store: "Lower Manhattan",
            category: "Tea",
            product_type: "Brewed Chai tea",
            price: 3.1,
            qty: 2.0,
        },
    ]
}

fn second_sheet_rows() -> Vec<SheetRow<'static>> {
    vec![SheetRow {
        date: "2023-02-01",
        time_fraction: 0.75,
        store: "Hell's Kitchen",
        category: "Bakery",
        product_type: "Scone",
        price: 3.75,
        qty: 3.0,
    }]
}

fn write_sales_xlsx(path: &PathBuf, with_second_sheet: bool) {
    let mut wb = rust_xlsxwriter::Workbook::new();
    write_sheet(wb.add_worksheet(), "January", &HEADERS, &first_sheet_rows());
    if with_second_sheet {
        write_sheet(wb.add_worksheet(), "February", &HEADERS, &second_sheet_rows());
    }
    wb.save(path).unwrap();
}

#[test]
fn load_excel_happy_path() {
    let path = tmp_file("sales");
    write_sales_xlsx(&path, false);

    let table = load_excel_from_path(&path, None).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(table.row_count(), 2);
    let first = &table.records[0];
    assert_eq!(first.transaction_date(), NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    assert_eq!(first.transaction_time, NaiveTime::from_hms_opt(12, 0, 0));
    assert_eq!(first.store_location, "Astoria");
    assert_eq!(first.unit_price, 2.0);
    assert_eq!(first.transaction_qty, 1);
    assert_eq!(table.records[1].transaction_time, NaiveTime::from_hms_opt(6, 0, 0));
}

#[test]
fn load_excel_defaults_to_first_sheet() {
    let path = tmp_file("first-sheet");
    write_sales_xlsx(&path, true);

    let table = load_from_path(&path, &LoadOptions::default()).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(table.row_count(), 2);
    assert!(table.iter().all(|r| r.transaction_date().format("%m").to_string() == "01"));
}

#[test]
fn load_excel_all_sheets_concatenates_rows() {
    let path = tmp_file("all-sheets");
    write_sales_xlsx(&path, true);

    let table = load_excel_workbook_from_path(&path, None).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(table.row_count(), 3);
    assert_eq!(table.records[2].store_location, "Hell's Kitchen");
    assert_eq!(table.records[2].transaction_qty, 3);
}

#[test]
fn load_excel_named_sheet_via_options() {
    let path = tmp_file("named-sheet");
    write_sales_xlsx(&path, true);

    let options = LoadOptions {
        excel_sheet_selection: ExcelSheetSelection::Sheet("February".to_string()),
        ..Default::default()
    };
    let table = load_from_path(&path, &options).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(table.row_count(), 1);
    assert_eq!(table.records[0].product_type, "Scone");
    assert_eq!(table.records[0].month(), "February");
}

#[test]
fn load_excel_errors_on_missing_required_column() {
    let path = tmp_file("missing");
    let mut wb = rust_xlsxwriter::Workbook::new();
    write_sheet(wb.add_worksheet(), "Sales", &HEADERS[..6], &first_sheet_rows());
    wb.save(&path).unwrap();

    let err = load_excel_from_path(&path, None).unwrap_err();
    let _ = std::fs::remove_file(&path);

    let msg = err.to_string();
    assert!(msg.contains("sheet 'Sales'"));
    assert!(msg.contains("missing required column 'transaction_qty'"));
}

#[test]
fn load_excel_parse_error_names_the_sheet() {
    let path = tmp_file("bad-date");
    let mut wb = rust_xlsxwriter::Workbook::new();
    let rows = vec![SheetRow {
        date: "sometime",
        time_fraction: 0.5,
        store: "Astoria",
        category: "Coffee",
        product_type: "Drip coffee",
        price: 2.0,
        qty: 1.0,
    }];
    write_sheet(wb.add_worksheet(), "Sales", &HEADERS, &rows);
    wb.save(&path).unwrap();

    let err = load_excel_from_path(&path, None).unwrap_err();
    let _ = std::fs::remove_file(&path);

    match err {
        DataSourceError::ParseError { row, column, .. } => {
            assert_eq!(row, 2);
            assert_eq!(column, "Sales:transaction_date");
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}
