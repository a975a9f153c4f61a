//! Loading entrypoints and implementations.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`LoadOptions`])
//! - loads all rows into an immutable [`crate::types::Table`] of typed transactions
//! - reports success/failure/alerts to a [`LoadObserver`] ([`TracingObserver`] by default)
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - `excel` (cargo feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod json;
pub mod observability;
mod row;
pub mod unified;

pub use observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver};
pub use unified::{load_from_path, ExcelSheetSelection, LoadOptions, LoadRequest, SourceFormat};
