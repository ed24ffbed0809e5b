//! Tracing subscriber bootstrap.
//!
//! The binary calls [`init_tracing`] once at startup. `RUST_LOG` takes
//! precedence over the configured level.

use crate::TallyResult;
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directives when neither `RUST_LOG` nor a level is given.
pub const DEFAULT_FILTER: &str = "info,tally=debug,tower_http=debug";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, one line per event.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a configured format name; anything but `json` is pretty.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Builds the filter directives for a configured level.
#[must_use]
pub fn filter_directives(level: Option<&str>) -> String {
    match level {
        Some(level) if !level.trim().is_empty() => {
            format!("{level},tally={level},tower_http={level}")
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// Installs the global tracing subscriber.
#[cfg(feature = "telemetry")]
pub fn init_tracing(level: Option<&str>, format: LogFormat) -> TallyResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| crate::TallyError::internal(format!("Failed to initialize tracing: {e}")))
}

/// No-op when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_level: Option<&str>, _format: LogFormat) -> TallyResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_name() {
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_name("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_name("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_filter_directives() {
        assert_eq!(filter_directives(None), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("")), DEFAULT_FILTER);
        assert_eq!(filter_directives(Some("warn")), "warn,tally=warn,tower_http=warn");
    }
}
