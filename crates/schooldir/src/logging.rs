//! Process-wide logging setup.
//!
//! Events from the `tracing` macros and from the `log` facade (used by the
//! database layer) end up in the same subscriber. `RUST_LOG` overrides the
//! default `info` filter.

use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::error::SchoolDirError;

const DEFAULT_FILTER: &str = "info,sqlx=warn,tower_http=info";

/// Installs the global subscriber. Output is JSON lines when `json` is set.
pub fn init_logging(json: bool) -> Result<(), SchoolDirError> {
    LogTracer::init()
        .map_err(|e| SchoolDirError::Logging(format!("Failed to bridge log records: {}", e)))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = if json {
        let subscriber = Registry::default()
            .with(env_filter)
            .with(fmt::layer().json().with_target(true));
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = Registry::default()
            .with(env_filter)
            .with(fmt::layer().with_target(true));
        tracing::subscriber::set_global_default(subscriber)
    };

    result.map_err(|e| SchoolDirError::Logging(format!("Failed to set logger: {}", e)))
}
