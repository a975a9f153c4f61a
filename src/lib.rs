//! `retail-sales-dashboard` loads a coffee-shop style transaction file into an in-memory
//! [`types::Table`] and computes the aggregates behind an interactive sales dashboard.
//!
//! The data flow is one-directional:
//!
//! 1. [`provider::DataProvider`] loads the source once (CSV, JSON or a spreadsheet) and shares
//!    it as an `Arc<Table>`.
//! 2. A [`processing::FilterSpec`] (stores, categories, product types, date range) is applied to
//!    produce a filtered view.
//! 3. [`report::DashboardReport`] computes every aggregate for that view: key metrics, sales over
//!    time, sales by store, top-N product types, category distribution and the quantity pivot.
//! 4. A [`render::PresentationSink`] draws the report and the view's rows; [`export`] writes
//!    the view as CSV.
//!
//! ## What you can load
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Excel/workbooks** (requires the Cargo feature `excel`, on by default): `.xlsx`, `.xls`,
//!   `.xlsm`, `.xlsb`, `.ods`
//!
//! Required columns are `transaction_date`, `store_location`, `product_category`,
//! `product_type`, `unit_price` and `transaction_qty`. `transaction_id`, `transaction_time`,
//! `store_id`, `product_id` and `product_detail` are read when present. Day, month and year
//! columns in the input are ignored and recomputed from `transaction_date`.
//!
//! ## Quick example
//!
//! ```no_run
//! use retail_sales_dashboard::ingestion::LoadOptions;
//! use retail_sales_dashboard::processing::FilterSpec;
//! use retail_sales_dashboard::provider::DataProvider;
//! use retail_sales_dashboard::report::ReportOptions;
//! use retail_sales_dashboard::session::DashboardSession;
//!
//! # fn main() -> Result<(), retail_sales_dashboard::DataSourceError> {
//! let provider = DataProvider::from_path("Coffee Shop Sales.xlsx", LoadOptions::default());
//! let table = provider.load()?;
//!
//! let session = DashboardSession::with_filter(table, FilterSpec::new().with_stores(["Astoria"]));
//! let report = session.report(&ReportOptions::default());
//! println!("total sales: {}", report.metrics.total_sales);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified loading entrypoints, format-specific loaders and load observers
//! - [`types`]: the transaction record and table
//! - [`processing`]: filtering and aggregation
//! - [`report`]: aggregates bundled per view, plus chart/top-N options
//! - [`render`]: text and JSON presentation sinks
//! - [`session`]: per-user filter state over the shared table
//! - [`provider`]: load-once access to the table
//! - [`export`]: CSV export of a view
//! - [`logging`]: `tracing-subscriber` setup for binaries
//! - [`error`]: error types

pub mod error;
pub mod export;
pub mod ingestion;
pub mod logging;
pub mod processing;
pub mod provider;
pub mod render;
pub mod report;
pub mod session;
pub mod types;

pub use error::{DataSourceError, DataSourceResult, ExportError, InvalidRangeError};
