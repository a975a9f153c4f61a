//! Presentation sinks.
//!
//! A sink receives the current [`FilterSpec`], the filtered rows and their [`DashboardReport`]
//! and draws them. The core never depends on a particular sink; these two cover terminals and
//! machine consumers.

use std::io::{self, Write};

use serde::Serialize;

use crate::processing::FilterSpec;
use crate::report::{format_currency, DashboardReport};
use crate::types::{Table, Transaction};

/// Something that can present a dashboard report.
pub trait PresentationSink {
    fn render(&mut self, spec: &FilterSpec, view: &Table, report: &DashboardReport) -> io::Result<()>;
}

/// Plain-text rendering with horizontal bars and a capped row listing.
#[derive(Debug)]
pub struct TextSink<W> {
    out: W,
    bar_width: usize,
    row_limit: usize,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            bar_width: 40,
            row_limit: 20,
        }
    }

    /// Most transactions listed in the raw data section. `0` hides the listing.
    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Width in characters of the longest bar.
    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || value <= 0.0 {
            return String::new();
        }
        let len = ((value / max) * self.bar_width as f64).round() as usize;
        "#".repeat(len.max(1))
    }

    fn section(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{}", "-".repeat(title.chars().count()))
    }

    fn ranking<V: Copy + Into<f64>>(&mut self, rows: &[(String, V)], fmt: fn(V) -> String) -> io::Result<()> {
        if rows.is_empty() {
            return writeln!(self.out, "(no data)");
        }
        let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let max = rows.iter().map(|(_, v)| (*v).into()).fold(0.0_f64, f64::max);
        for (label, value) in rows {
            let bar = self.bar((*value).into(), max);
            writeln!(self.out, "{label:<width$}  {:>12}  {bar}", fmt(*value))?;
        }
        Ok(())
    }

    fn rows(&mut self, view: &Table) -> io::Result<()> {
        if view.is_empty() {
            return writeln!(self.out, "(no data)");
        }
        let shown: Vec<[String; 8]> = view.iter().take(self.row_limit).map(row_cells).collect();
        let mut widths = ROW_HEADERS.map(str::len);
        for cells in &shown {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
        self.row_line(&ROW_HEADERS.map(str::to_string), &widths)?;
        for cells in &shown {
            self.row_line(cells, &widths)?;
        }
        let hidden = view.row_count() - shown.len();
        if hidden > 0 {
            writeln!(self.out, "... {hidden} more rows")?;
        }
        Ok(())
    }

    fn row_line(&mut self, cells: &[String; 8], widths: &[usize; 8]) -> io::Result<()> {
        let line = cells
            .iter()
            .zip(widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.out, "{}", line.trim_end())
    }
}

const ROW_HEADERS: [&str; 8] = ["Date", "Time", "Store", "Category", "Type", "Detail", "Qty", "Price"];

fn row_cells(row: &Transaction) -> [String; 8] {
    [
        row.transaction_date().to_string(),
        row.transaction_time.map(|t| t.to_string()).unwrap_or_default(),
        row.store_location.clone(),
        row.product_category.clone(),
        row.product_type.clone(),
        row.product_detail.clone().unwrap_or_default(),
        row.transaction_qty.to_string(),
        format_currency(row.unit_price),
    ]
}

fn describe(selection: &std::collections::BTreeSet<String>) -> String {
    if selection.is_empty() {
        "all".to_string()
    } else {
        selection.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

impl<W: Write> PresentationSink for TextSink<W> {
    fn render(&mut self, spec: &FilterSpec, view: &Table, report: &DashboardReport) -> io::Result<()> {
        writeln!(self.out, "Sales Dashboard")?;
        writeln!(self.out, "===============")?;
        writeln!(self.out, "Stores:        {}", describe(&spec.stores))?;
        writeln!(self.out, "Categories:    {}", describe(&spec.categories))?;
        writeln!(self.out, "Product types: {}", describe(&spec.product_types))?;
        let dates = match (spec.date_range.lower(), spec.date_range.upper()) {
            (None, _) => "all".to_string(),
            (Some(lower), None) => format!("from {lower}"),
            (Some(lower), Some(upper)) => format!("{lower} to {upper}"),
        };
        writeln!(self.out, "Dates:         {dates}")?;
        if let Some(warning) = report.warning {
            writeln!(self.out, "Warning:       {warning}")?;
        }

        self.section("Key Metrics")?;
        for (label, value) in report.metrics.display_rows() {
            writeln!(self.out, "{label:<20}{value}")?;
        }

        self.section(&format!("Sales Over Time ({})", report.sales_over_time.kind))?;
        let series: Vec<(String, f64)> = report
            .sales_over_time
            .points
            .iter()
            .map(|(date, v)| (date.to_string(), *v))
            .collect();
        self.ranking(&series, format_currency)?;

        self.section("Sales by Store Location")?;
        self.ranking(&report.sales_by_store, format_currency)?;

        self.section(&format!("Top {} Product Types by Transactions", report.top_n.get()))?;
        let top: Vec<(String, u32)> = report
            .top_product_types
            .iter()
            .map(|(l, c)| (l.clone(), u32::try_from(*c).unwrap_or(u32::MAX)))
            .collect();
        self.ranking(&top, |c| c.to_string())?;

        self.section("Product Category Distribution")?;
        let categories: Vec<(String, u32)> = report
            .category_distribution
            .iter()
            .map(|(l, c)| (l.clone(), u32::try_from(*c).unwrap_or(u32::MAX)))
            .collect();
        self.ranking(&categories, |c| c.to_string())?;

        self.section("Transaction Quantity by Product and Store")?;
        let pivot = &report.quantity_pivot;
        if pivot.is_empty() {
            writeln!(self.out, "(no data)")?;
        } else {
            let label_width = pivot.row_labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            write!(self.out, "{:<label_width$}", "")?;
            for column in &pivot.column_labels {
                write!(self.out, "  {column:>12}")?;
            }
            writeln!(self.out)?;
            for (row, cells) in pivot.row_labels.iter().zip(&pivot.cells) {
                write!(self.out, "{row:<label_width$}")?;
                for cell in cells {
                    write!(self.out, "  {cell:>12}")?;
                }
                writeln!(self.out)?;
            }
        }

        if self.row_limit > 0 {
            self.section("Transactions")?;
            self.rows(view)?;
        }
        self.out.flush()
    }
}

/// JSON rendering of the filters, report and filtered records.
#[derive(Debug)]
pub struct JsonSink<W> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, pretty: true }
    }

    /// Emit a single line instead of indented output.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(Serialize)]
struct Frame<'a> {
    filters: &'a FilterSpec,
    report: &'a DashboardReport,
    records: &'a [Transaction],
}

impl<W: Write> PresentationSink for JsonSink<W> {
    fn render(&mut self, spec: &FilterSpec, view: &Table, report: &DashboardReport) -> io::Result<()> {
        let frame = Frame {
            filters: spec,
            report,
            records: &view.records,
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &frame)?;
        } else {
            serde_json::to_writer(&mut self.out, &frame)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}
