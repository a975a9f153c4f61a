//! Logging setup for binaries embedding the dashboard.
//!
//! The library itself only emits `tracing` events; installing a subscriber is left to the
//! application. [`init_logging`] installs a `tracing-subscriber` fmt layer with an
//! [`EnvFilter`](tracing_subscriber::EnvFilter) that honours `RUST_LOG`.

use tracing::Level;
use tracing_subscriber::util::TryInitError;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Log level for everything outside this crate.
    pub level: Level,
    /// Log level for this crate's components.
    pub crate_level: Level,
    /// Emit JSON lines instead of human-readable output.
    pub json_format: bool,
    /// Filter directive overriding both levels (same syntax as `RUST_LOG`).
    pub env_filter: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            crate_level: Level::INFO,
            json_format: false,
            env_filter: None,
        }
    }
}

impl LogSettings {
    /// Debug-level output for this crate.
    pub fn verbose() -> Self {
        Self {
            crate_level: Level::DEBUG,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_crate_level(mut self, level: Level) -> Self {
        self.crate_level = level;
        self
    }

    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Builds the filter directive string.
    pub fn env_filter(&self) -> String {
        match &self.env_filter {
            Some(filter) => filter.clone(),
            None => format!(
                "{},retail_sales_dashboard={},sales_dashboard={}",
                self.level.as_str().to_lowercase(),
                self.crate_level.as_str().to_lowercase(),
                self.crate_level.as_str().to_lowercase()
            ),
        }
    }
}

/// Install a global subscriber. `RUST_LOG`, when set, takes precedence over `settings`.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(settings: &LogSettings) -> Result<(), TryInitError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(settings.env_filter()));

    let fmt_layer = if settings.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
}
