use chrono::{NaiveDate, NaiveTime};
use retail_sales_dashboard::ingestion::json::load_json_from_str;
use retail_sales_dashboard::DataSourceError;

#[test]
fn load_json_array_of_objects() {
    let input = r#"[
        {"transaction_id": 7, "transaction_date": "2023-01-02", "transaction_time": "08:10:12",
         "transaction_qty": 1, "store_id": 3, "store_location": "Astoria", "product_id": 32,
         "unit_price": 3, "product_category": "Coffee", "product_type": "Gourmet brewed coffee",
         "product_detail": "Ethiopia Rg"},
        {"transaction_date": "2023-01-02", "transaction_qty": 3, "store_location": "Astoria",
         "unit_price": 3.5, "product_category": "Bakery", "product_type": "Pastry",
         "product_detail": null}
    ]"#;

    let table = load_json_from_str(input).unwrap();
    assert_eq!(table.row_count(), 2);

    let first = &table.records[0];
    assert_eq!(first.transaction_id, Some(7));
    assert_eq!(first.transaction_time, NaiveTime::from_hms_opt(8, 10, 12));
    assert_eq!(first.unit_price, 3.0);
    assert_eq!(first.product_detail.as_deref(), Some("Ethiopia Rg"));

    let second = &table.records[1];
    assert_eq!(second.transaction_id, None);
    assert_eq!(second.product_detail, None);
    assert_eq!(second.transaction_qty, 3);
}

#[test]
fn load_ndjson_lines() {
    let input = "{\"transaction_date\":\"2025-01-01\",\"store_location\":\"Store A\",\"product_category\":\"Bakery\",\"product_type\":\"Scone\",\"unit_price\":3.0,\"transaction_qty\":1}\n\
                 \n\
                 {\"transaction_date\":\"2025-01-02 09:15:00\",\"store_location\":\"Store B\",\"product_category\":\"Coffee\",\"product_type\":\"Latte\",\"unit_price\":4.5,\"transaction_qty\":2}\n";

    let table = load_json_from_str(input).unwrap();
    assert_eq!(table.row_count(), 2);
    let second = &table.records[1];
    assert_eq!(second.transaction_date(), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
    assert_eq!(second.transaction_time, NaiveTime::from_hms_opt(9, 15, 0));
}

#[test]
fn load_json_empty_array_is_an_empty_table() {
    let table = load_json_from_str("[]").unwrap();
    assert!(table.is_empty());
}

#[test]
fn load_json_errors_on_missing_required_key() {
    let input = r#"[{"transaction_date": "2025-01-01", "store_location": "Store A"}]"#;
    let err = load_json_from_str(input).unwrap_err();
    assert!(err.to_string().contains("missing required column 'product_category'"));
}

#[test]
fn load_json_errors_on_later_row_missing_value() {
    let input = r#"[
        {"transaction_date": "2025-01-01", "store_location": "Store A", "product_category": "Bakery",
         "product_type": "Scone", "unit_price": 3.0, "transaction_qty": 1},
        {"transaction_date": "2025-01-02", "store_location": "Store A", "product_category": "Bakery",
         "product_type": "Scone", "transaction_qty": 1}
    ]"#;
    match load_json_from_str(input).unwrap_err() {
        DataSourceError::ParseError { row, column, .. } => {
            assert_eq!(row, 2);
            assert_eq!(column, "unit_price");
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn load_json_rejects_scalars() {
    let err = load_json_from_str("42").unwrap_err();
    assert!(matches!(err, DataSourceError::SchemaMismatch { .. }));
}

#[test]
fn load_json_matches_keys_with_surrounding_whitespace() {
    let input = r#"[{"transaction_date": "2025-01-01", " store_location ": "Store A",
                    "product_category": "Bakery", "product_type": "Scone",
                    " unit_price": 3.25, "transaction_qty ": 2}]"#;

    let table = load_json_from_str(input).unwrap();
    let row = &table.records[0];
    assert_eq!(row.store_location, "Store A");
    assert_eq!(row.unit_price, 3.25);
    assert_eq!(row.transaction_qty, 2);
}
