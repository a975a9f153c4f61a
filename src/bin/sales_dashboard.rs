//! Sales dashboard
//!
//! Loads a transaction file, applies the selected filters and prints the dashboard report as
//! text or JSON. Optionally exports the filtered rows as CSV.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing::Level;

use retail_sales_dashboard::export::write_csv_to_path;
use retail_sales_dashboard::ingestion::{ExcelSheetSelection, LoadOptions};
use retail_sales_dashboard::logging::{init_logging, LogSettings};
use retail_sales_dashboard::processing::{DateRange, FilterSpec, TopN};
use retail_sales_dashboard::provider::DataProvider;
use retail_sales_dashboard::render::{JsonSink, PresentationSink, TextSink};
use retail_sales_dashboard::report::{ChartKind, ReportOptions};
use retail_sales_dashboard::session::DashboardSession;
use retail_sales_dashboard::types::Table;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transaction file (.csv, .json, .ndjson, .xlsx, ...)
    file: PathBuf,

    /// Restrict to a store location (repeatable)
    #[arg(long = "store", value_name = "STORE")]
    stores: Vec<String>,

    /// Restrict to a product category (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<String>,

    /// Restrict to a product type (repeatable)
    #[arg(long = "product-type", value_name = "TYPE")]
    product_types: Vec<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// How to draw sales over time
    #[arg(long, default_value = "line")]
    chart: ChartKind,

    /// Number of product types in the ranking (3-15)
    #[arg(long, default_value = "5", value_parser = parse_top_n)]
    top_n: TopN,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write the filtered rows to this CSV file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Workbook sheet to read (defaults to the first sheet)
    #[arg(long, conflicts_with = "all_sheets")]
    sheet: Option<String>,

    /// Read every sheet of the workbook
    #[arg(long)]
    all_sheets: bool,

    /// Most transactions listed in text output (0 hides the listing)
    #[arg(long, default_value_t = 20)]
    max_rows: usize,

    /// Log level for this tool
    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_top_n(raw: &str) -> Result<TopN, String> {
    let value: usize = raw.parse().map_err(|e| format!("{e}"))?;
    TopN::new(value).map_err(|e| e.to_string())
}

fn date_range(table: &Table, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<DateRange> {
    let range = match (from, to) {
        (None, None) => DateRange::unbounded(),
        (Some(lower), None) => DateRange::starting(lower),
        (Some(lower), Some(upper)) => DateRange::between(lower, upper)?,
        (None, Some(upper)) => match table.date_bounds() {
            Some((earliest, _)) => DateRange::between(earliest.min(upper), upper)?,
            None => DateRange::unbounded(),
        },
    };
    Ok(range)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = LogSettings::default()
        .with_crate_level(args.log_level)
        .with_json_format(args.log_json);
    init_logging(&settings).context("failed to install log subscriber")?;

    let excel_sheet_selection = match (&args.sheet, args.all_sheets) {
        (Some(name), _) => ExcelSheetSelection::Sheet(name.clone()),
        (None, true) => ExcelSheetSelection::AllSheets,
        (None, false) => ExcelSheetSelection::First,
    };
    let options = LoadOptions::default().with_sheets(excel_sheet_selection);

    let provider = DataProvider::from_path(&args.file, options);
    let table = provider
        .load()
        .with_context(|| format!("failed to load {}", args.file.display()))?;

    let spec = FilterSpec::new()
        .with_stores(args.stores)
        .with_categories(args.categories)
        .with_product_types(args.product_types)
        .with_date_range(date_range(&table, args.from, args.to)?);
    let session = DashboardSession::with_filter(table, spec);

    let report_options = ReportOptions {
        chart_kind: args.chart,
        top_n: args.top_n,
    };
    let report = session.report(&report_options);

    let stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => TextSink::new(stdout)
            .with_row_limit(args.max_rows)
            .render(session.spec(), session.view(), &report)?,
        OutputFormat::Json => JsonSink::new(stdout).render(session.spec(), session.view(), &report)?,
    }

    if let Some(path) = &args.export {
        write_csv_to_path(session.view(), path)
            .with_context(|| format!("failed to export to {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = session.view().row_count(), "view exported");
    }

    Ok(())
}
