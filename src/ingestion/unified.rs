//! Format detection and the single loading entrypoint.
//!
//! [`load_from_path`] picks a loader from [`LoadOptions::format`] (or the file extension),
//! reads the whole file into a [`Table`], and reports the outcome to [`LoadOptions::observer`].
//! [`crate::provider::DataProvider`] wraps it so the file is read only once.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{DataSourceError, DataSourceResult};
use crate::types::Table;

use super::observability::{LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver};
use super::{csv, json};

/// Source file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// A JSON array of objects, or NDJSON.
    Json,
    /// Spreadsheet workbooks; reading them needs the `excel` feature.
    Excel,
}

impl SourceFormat {
    /// Format for a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }

    /// Format implied by the extension of `path`.
    pub fn from_path(path: &Path) -> DataSourceResult<Self> {
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            return Err(DataSourceError::SchemaMismatch {
                message: format!("cannot infer format: path has no extension ({})", path.display()),
            });
        };
        Self::from_extension(ext).ok_or_else(|| DataSourceError::SchemaMismatch {
            message: format!("cannot infer format from extension '{ext}' ({})", path.display()),
        })
    }

    fn read(self, path: &Path, sheets: &ExcelSheetSelection) -> DataSourceResult<Table> {
        match self {
            SourceFormat::Csv => csv::load_csv_from_path(path),
            SourceFormat::Json => json::load_json_from_path(path),
            SourceFormat::Excel => read_workbook(path, sheets),
        }
    }
}

#[cfg(feature = "excel")]
fn read_workbook(path: &Path, sheets: &ExcelSheetSelection) -> DataSourceResult<Table> {
    use super::excel::{load_excel_from_path, load_excel_workbook_from_path};

    match sheets {
        ExcelSheetSelection::First => load_excel_from_path(path, None),
        ExcelSheetSelection::Sheet(name) => load_excel_from_path(path, Some(name.as_str())),
        ExcelSheetSelection::AllSheets => load_excel_workbook_from_path(path, None),
        ExcelSheetSelection::Sheets(names) => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            load_excel_workbook_from_path(path, Some(names.as_slice()))
        }
    }
}

#[cfg(not(feature = "excel"))]
fn read_workbook(path: &Path, _sheets: &ExcelSheetSelection) -> DataSourceResult<Table> {
    Err(DataSourceError::SchemaMismatch {
        message: format!(
            "{} is a workbook but this build has no excel support (enable feature 'excel')",
            path.display()
        ),
    })
}

/// Which workbook sheets become the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    #[default]
    First,
    Sheet(String),
    /// Every sheet, rows concatenated in workbook order.
    AllSheets,
    /// The listed sheets, rows concatenated in the given order.
    Sheets(Vec<String>),
}

/// How a file is loaded and where its outcome is reported.
#[derive(Clone)]
pub struct LoadOptions {
    /// Forced format; `None` infers it from the extension.
    pub format: Option<SourceFormat>,
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Receives every load outcome. Defaults to [`TracingObserver`].
    pub observer: Arc<dyn LoadObserver>,
    /// Failures at or above this severity are also sent to [`LoadObserver::on_alert`].
    pub alert_at_or_above: LoadSeverity,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::First,
            observer: Arc::new(TracingObserver),
            alert_at_or_above: LoadSeverity::Critical,
        }
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish_non_exhaustive()
    }
}

impl LoadOptions {
    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_sheets(mut self, selection: ExcelSheetSelection) -> Self {
        self.excel_sheet_selection = selection;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_alert_threshold(mut self, severity: LoadSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    fn report(&self, ctx: &LoadContext, outcome: &DataSourceResult<Table>) {
        match outcome {
            Ok(table) => self.observer.on_success(ctx, LoadStats { rows: table.row_count() }),
            Err(error) => {
                let severity = LoadSeverity::of(error);
                self.observer.on_failure(ctx, severity, error);
                if severity >= self.alert_at_or_above {
                    self.observer.on_alert(ctx, severity, error);
                }
            }
        }
    }
}

/// Load a transaction file into a [`Table`], reporting the outcome to `options.observer`.
///
/// A path whose format cannot be determined fails before anything is read or reported.
///
/// # Examples
///
/// ```no_run
/// use retail_sales_dashboard::ingestion::{load_from_path, ExcelSheetSelection, LoadOptions};
///
/// # fn main() -> Result<(), retail_sales_dashboard::DataSourceError> {
/// let options = LoadOptions::default().with_sheets(ExcelSheetSelection::AllSheets);
/// let table = load_from_path("Coffee Shop Sales.xlsx", &options)?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> DataSourceResult<Table> {
    let path = path.as_ref();
    let format = match options.format {
        Some(format) => format,
        None => SourceFormat::from_path(path)?,
    };

    let outcome = format.read(path, &options.excel_sheet_selection);
    let ctx = LoadContext {
        path: path.to_path_buf(),
        format,
    };
    options.report(&ctx, &outcome);
    outcome
}

/// A path plus the options to load it with.
///
/// [`crate::provider::DataProvider`] holds one of these and runs it until it succeeds once.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub path: PathBuf,
    pub options: LoadOptions,
}

impl LoadRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn run(&self) -> DataSourceResult<Table> {
        load_from_path(&self.path, &self.options)
    }
}
