//! Filter specifications and view filtering.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::InvalidRangeError;
use crate::types::{Table, Transaction};

/// Inclusive calendar-date restriction with zero, one or two bounds.
///
/// One bound is an open-ended "on or after" restriction. Construction rejects a lower bound
/// after the upper bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange(Bounds);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
enum Bounds {
    #[default]
    Unbounded,
    From(NaiveDate),
    Between(NaiveDate, NaiveDate),
}

impl DateRange {
    /// No date restriction.
    pub fn unbounded() -> Self {
        Self(Bounds::Unbounded)
    }

    /// Dates on or after `lower`.
    pub fn starting(lower: NaiveDate) -> Self {
        Self(Bounds::From(lower))
    }

    /// Dates in `[lower, upper]`.
    pub fn between(lower: NaiveDate, upper: NaiveDate) -> Result<Self, InvalidRangeError> {
        if lower > upper {
            return Err(InvalidRangeError::DateRange { lower, upper });
        }
        Ok(Self(Bounds::Between(lower, upper)))
    }

    /// Build a range from a date picker selection of zero, one or two dates.
    pub fn from_bounds(dates: &[NaiveDate]) -> Result<Self, InvalidRangeError> {
        match *dates {
            [] => Ok(Self::unbounded()),
            [lower] => Ok(Self::starting(lower)),
            [lower, upper] => Self::between(lower, upper),
            _ => Err(InvalidRangeError::TooManyBounds { count: dates.len() }),
        }
    }

    pub fn lower(&self) -> Option<NaiveDate> {
        match self.0 {
            Bounds::Unbounded => None,
            Bounds::From(lower) | Bounds::Between(lower, _) => Some(lower),
        }
    }

    pub fn upper(&self) -> Option<NaiveDate> {
        match self.0 {
            Bounds::Between(_, upper) => Some(upper),
            _ => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self.0, Bounds::Unbounded)
    }

    /// Whether `date` satisfies the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self.0 {
            Bounds::Unbounded => true,
            Bounds::From(lower) => date >= lower,
            Bounds::Between(lower, upper) => lower <= date && date <= upper,
        }
    }
}

/// The user's current selection of stores, categories, product types and dates.
///
/// An empty set means "no restriction on this field". Within one field selected values are
/// alternatives; across fields all restrictions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FilterSpec {
    pub stores: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub product_types: BTreeSet<String>,
    pub date_range: DateRange,
}

impl FilterSpec {
    /// An unrestricted specification.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stores<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stores = stores.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_product_types<I, S>(mut self, product_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.product_types = product_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Whether no field restricts the view.
    pub fn is_unrestricted(&self) -> bool {
        self.stores.is_empty()
            && self.categories.is_empty()
            && self.product_types.is_empty()
            && self.date_range.is_unbounded()
    }

    /// Whether `record` satisfies every active restriction.
    pub fn matches(&self, record: &Transaction) -> bool {
        selected(&self.stores, &record.store_location)
            && selected(&self.categories, &record.product_category)
            && selected(&self.product_types, &record.product_type)
            && self.date_range.contains(record.transaction_date())
    }
}

fn selected(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

/// Returns a new [`Table`] containing only rows that satisfy `spec`.
///
/// The input table is left untouched. An unrestricted spec returns a copy of the full table.
pub fn apply(table: &Table, spec: &FilterSpec) -> Table {
    let view = if spec.is_unrestricted() {
        table.clone()
    } else {
        table.filter_rows(|record| spec.matches(record))
    };
    tracing::debug!(
        input_rows = table.row_count(),
        output_rows = view.row_count(),
        stores = spec.stores.len(),
        categories = spec.categories.len(),
        product_types = spec.product_types.len(),
        "filter applied"
    );
    view
}
