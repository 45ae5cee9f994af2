//! Log output for the `vetlog` binaries.
//!
//! Logs go to stderr so report output on stdout (such as `schedule --json`) stays parseable.

use std::env;
use std::io;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("log filter '{directive}' is not valid")]
    Filter {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("tracing subscriber could not be installed: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Filter from `RUST_LOG` when it is set, else from the configured level.
pub fn filter_for(
    config: &TelemetryConfig,
    rust_log: Option<&str>,
) -> Result<EnvFilter, TelemetryError> {
    let directive = rust_log
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(config.log_level.as_str());
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::Filter {
        directive: directive.to_string(),
        source,
    })
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let rust_log = env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_for(config, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}
