//! Load outcome reporting.
//!
//! Every call to [`super::load_from_path`] reports its outcome to a [`LoadObserver`]. The default
//! is [`TracingObserver`], which turns outcomes into `tracing` events; where those end up is
//! decided by the installed subscriber (see [`crate::logging`]).

use std::path::PathBuf;

use crate::error::DataSourceError;

use super::unified::SourceFormat;

/// How serious a load failure is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadSeverity {
    Info,
    Warning,
    /// The source was readable but its content was not a transaction table.
    Error,
    /// The source could not be read at all.
    Critical,
}

impl LoadSeverity {
    /// Classify a load error. I/O failures are critical; bad content is an error.
    pub fn of(error: &DataSourceError) -> Self {
        let io_failure = match error {
            DataSourceError::Io(_) => true,
            DataSourceError::Csv(err) => matches!(err.kind(), csv::ErrorKind::Io(_)),
            #[cfg(feature = "excel")]
            DataSourceError::Excel(err) => matches!(err, calamine::Error::Io(_)),
            DataSourceError::Json(err) => err.is_io(),
            DataSourceError::SchemaMismatch { .. } | DataSourceError::ParseError { .. } => false,
        };
        if io_failure {
            LoadSeverity::Critical
        } else {
            LoadSeverity::Error
        }
    }
}

/// Which source a load read from.
#[derive(Debug, Clone)]
pub struct LoadContext {
    pub path: PathBuf,
    pub format: SourceFormat,
}

/// Summary of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of transactions loaded.
    pub rows: usize,
}

/// Receives load outcomes.
pub trait LoadObserver: Send + Sync {
    fn on_success(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    fn on_failure(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &DataSourceError) {}

    /// Called after [`Self::on_failure`] when the severity reaches the configured threshold.
    fn on_alert(&self, _ctx: &LoadContext, _severity: LoadSeverity, _error: &DataSourceError) {}
}

/// Reports load outcomes as structured `tracing` events.
///
/// Successes are `INFO`. Failures are `WARN`, or `ERROR` when critical. Alerts are `ERROR` with
/// `alert = true`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_success(&self, ctx: &LoadContext, stats: LoadStats) {
        tracing::info!(
            format = ?ctx.format,
            path = %ctx.path.display(),
            rows = stats.rows,
            "transactions loaded"
        );
    }

    fn on_failure(&self, ctx: &LoadContext, severity: LoadSeverity, error: &DataSourceError) {
        if severity == LoadSeverity::Critical {
            tracing::error!(?severity, format = ?ctx.format, path = %ctx.path.display(), %error, "load failed");
        } else {
            tracing::warn!(?severity, format = ?ctx.format, path = %ctx.path.display(), %error, "load failed");
        }
    }

    fn on_alert(&self, ctx: &LoadContext, severity: LoadSeverity, error: &DataSourceError) {
        tracing::error!(
            alert = true,
            ?severity,
            format = ?ctx.format,
            path = %ctx.path.display(),
            %error,
            "load failure reached alert threshold"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::LoadSeverity;
    use crate::error::DataSourceError;

    #[test]
    fn io_failures_are_critical_and_content_failures_are_errors() {
        let io = DataSourceError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(LoadSeverity::of(&io), LoadSeverity::Critical);

        let schema = DataSourceError::SchemaMismatch {
            message: "missing required column".to_string(),
        };
        assert_eq!(LoadSeverity::of(&schema), LoadSeverity::Error);

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(LoadSeverity::of(&DataSourceError::Json(json)), LoadSeverity::Error);
        assert!(LoadSeverity::Critical > LoadSeverity::Error);
    }
}
