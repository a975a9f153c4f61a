//! Load-once access to the transaction table.
//!
//! A [`DataProvider`] is constructed once at startup and passed by reference to everything that
//! needs the base table. The first successful [`DataProvider::load`] reads the source; later
//! calls return the same shared [`Arc<Table>`] without touching the file again. There is no
//! invalidation: the source is assumed static for the life of the process.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::DataSourceResult;
use crate::ingestion::{LoadOptions, LoadRequest};
use crate::types::Table;

/// Memoizing owner of the base transaction table.
#[derive(Debug)]
pub struct DataProvider {
    request: LoadRequest,
    table: OnceCell<Arc<Table>>,
}

impl DataProvider {
    /// Create a provider for `request`. Nothing is read until [`Self::load`].
    pub fn new(request: LoadRequest) -> Self {
        Self {
            request,
            table: OnceCell::new(),
        }
    }

    /// Create a provider that reads `path` with `options`.
    pub fn from_path(path: impl AsRef<Path>, options: LoadOptions) -> Self {
        Self::new(LoadRequest::new(path.as_ref()).with_options(options))
    }

    /// Create a provider around an already-loaded table.
    pub fn from_table(request: LoadRequest, table: Table) -> Self {
        Self {
            request,
            table: OnceCell::with_value(Arc::new(table)),
        }
    }

    /// Load the table, reading the source only on the first successful call.
    ///
    /// A failed load is not cached; a later call retries the source.
    pub fn load(&self) -> DataSourceResult<Arc<Table>> {
        let table = self.table.get_or_try_init(|| {
            tracing::info!(path = %self.request.path.display(), "loading transactions");
            self.request.run().map(Arc::new)
        })?;
        Ok(Arc::clone(table))
    }

    /// Whether the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// The request this provider loads from.
    pub fn request(&self) -> &LoadRequest {
        &self.request
    }
}
