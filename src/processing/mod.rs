//! Filtering and aggregation over [`crate::types::Table`] views.
//!
//! - [`filter`]: [`FilterSpec`] / [`DateRange`] and [`apply()`]
//! - [`reduce`]: scalar statistics (total sales, count, mean price, top product)
//! - [`group`]: grouped series, top-N rankings and the quantity pivot
//!
//! Every aggregate is a pure function of the view it is given and is defined on an empty view.
//!
//! ## Example: filter → aggregate
//!
//! ```rust
//! use chrono::NaiveDate;
//! use retail_sales_dashboard::processing::{apply, top_product_by_frequency, total_sales, FilterSpec};
//! use retail_sales_dashboard::types::{Table, Transaction};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
//! let table = Table::new(vec![
//!     Transaction::new(day(1), "Store A", "Bakery", "Scone", 3.00, 1),
//!     Transaction::new(day(2), "Store B", "Coffee", "Latte", 4.50, 1),
//!     Transaction::new(day(2), "Store A", "Coffee", "Latte", 4.50, 1),
//! ]);
//!
//! let view = apply(&table, &FilterSpec::new().with_stores(["Store A"]));
//! assert_eq!(view.row_count(), 2);
//! assert_eq!(total_sales(&view), 7.5);
//! assert_eq!(top_product_by_frequency(&view), "Latte");
//! ```

pub mod filter;
pub mod group;
pub mod reduce;

pub use filter::{apply, DateRange, FilterSpec};
pub use group::{
    category_distribution, quantity_pivot, sales_by_store, sales_over_time, top_n_product_types, value_counts,
    PivotTable, TopN,
};
pub use reduce::{
    average_unit_price, reduce, top_product_by_frequency, total_sales, transaction_count, Measure, ReduceOp,
    NOT_AVAILABLE,
};
