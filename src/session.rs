//! Per-user dashboard state.
//!
//! The base table is shared read-only between sessions through an [`Arc`]; each session owns
//! its current [`FilterSpec`] and the view derived from it.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::processing::{apply, DateRange, FilterSpec};
use crate::report::{DashboardReport, ReportOptions, ViewWarning};
use crate::types::{Column, Table};

/// The values a user can pick from, derived from the full table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterChoices {
    /// Store locations in first-seen order.
    pub stores: Vec<String>,
    /// Product categories in first-seen order.
    pub categories: Vec<String>,
    /// Product types in first-seen order.
    pub product_types: Vec<String>,
    /// Earliest and latest transaction dates; `None` for an empty table.
    pub date_bounds: Option<(NaiveDate, NaiveDate)>,
}

impl FilterChoices {
    pub fn from_table(table: &Table) -> Self {
        Self {
            stores: table.distinct_values(Column::StoreLocation),
            categories: table.distinct_values(Column::ProductCategory),
            product_types: table.distinct_values(Column::ProductType),
            date_bounds: table.date_bounds(),
        }
    }

    /// The initial selection: nothing picked, dates spanning the whole table.
    pub fn default_spec(&self) -> FilterSpec {
        let date_range = match self.date_bounds {
            Some((lower, upper)) => DateRange::between(lower, upper).unwrap_or_default(),
            None => DateRange::unbounded(),
        };
        FilterSpec::new().with_date_range(date_range)
    }
}

/// One user's view of the shared table.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    table: Arc<Table>,
    spec: FilterSpec,
    view: Table,
}

impl DashboardSession {
    /// Start a session with an unrestricted filter.
    pub fn new(table: Arc<Table>) -> Self {
        let view = Table::clone(&table);
        Self {
            table,
            spec: FilterSpec::new(),
            view,
        }
    }

    /// Start a session with `spec` already applied.
    pub fn with_filter(table: Arc<Table>, spec: FilterSpec) -> Self {
        let view = apply(&table, &spec);
        Self { table, spec, view }
    }

    /// Replace the filter. The view is recomputed only if the spec changed.
    ///
    /// Returns `true` when the view was recomputed.
    pub fn set_filter(&mut self, spec: FilterSpec) -> bool {
        if spec == self.spec {
            return false;
        }
        self.view = apply(&self.table, &spec);
        self.spec = spec;
        tracing::debug!(rows = self.view.row_count(), "session view recomputed");
        true
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// The current filtered view.
    pub fn view(&self) -> &Table {
        &self.view
    }

    /// The shared base table.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn warning(&self) -> Option<ViewWarning> {
        ViewWarning::for_view(&self.view)
    }

    pub fn choices(&self) -> FilterChoices {
        FilterChoices::from_table(&self.table)
    }

    /// Compute the report for the current view.
    pub fn report(&self, options: &ReportOptions) -> DashboardReport {
        DashboardReport::compute(&self.view, options)
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardSession, FilterChoices};
    use crate::processing::{DateRange, FilterSpec};
    use crate::report::ViewWarning;
    use crate::types::{Table, Transaction};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn shared_table() -> Arc<Table> {
        Arc::new(Table::new(vec![
            Transaction::new(day(3), "Store B", "Coffee", "Latte", 4.5, 1),
            Transaction::new(day(1), "Store A", "Bakery", "Scone", 3.0, 1),
            Transaction::new(day(2), "Store A", "Coffee", "Latte", 4.5, 1),
        ]))
    }

    #[test]
    fn choices_follow_first_seen_order_and_span_dates() {
        let choices = FilterChoices::from_table(&shared_table());
        assert_eq!(choices.stores, vec!["Store B", "Store A"]);
        assert_eq!(choices.categories, vec!["Coffee", "Bakery"]);
        assert_eq!(choices.date_bounds, Some((day(1), day(3))));

        let spec = choices.default_spec();
        assert_eq!(spec.date_range, DateRange::between(day(1), day(3)).unwrap());
        assert!(spec.stores.is_empty());
    }

    #[test]
    fn set_filter_recomputes_only_on_change() {
        let mut session = DashboardSession::new(shared_table());
        assert_eq!(session.view().row_count(), 3);

        assert!(session.set_filter(FilterSpec::new().with_stores(["Store A"])));
        assert_eq!(session.view().row_count(), 2);
        assert!(!session.set_filter(FilterSpec::new().with_stores(["Store A"])));

        assert!(session.set_filter(FilterSpec::new().with_stores(["Store C"])));
        assert_eq!(session.warning(), Some(ViewWarning::EmptyView));
    }

    #[test]
    fn sessions_share_the_base_table() {
        let table = shared_table();
        let mut a = DashboardSession::new(Arc::clone(&table));
        let b = DashboardSession::with_filter(Arc::clone(&table), FilterSpec::new().with_categories(["Bakery"]));
        a.set_filter(FilterSpec::new().with_stores(["Store B"]));

        assert!(Arc::ptr_eq(a.table(), b.table()));
        assert_eq!(a.view().row_count(), 1);
        assert_eq!(b.view().row_count(), 1);
        assert_eq!(table.row_count(), 3);
    }
}
