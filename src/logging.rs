//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Pick the log filter with priority: CLI > RUST_LOG > settings default.
pub fn resolve_log_filter(cli: Option<String>, default: &str) -> String {
    choose_log_filter(cli, std::env::var("RUST_LOG").ok(), default)
}

fn choose_log_filter(cli: Option<String>, rust_log: Option<String>, default: &str) -> String {
    cli.or(rust_log).unwrap_or_else(|| default.to_string())
}

/// Install the global tracing subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init_tracing(
    filter: &str,
    format: LogFormat,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEBUG_LOG_FILTER, DEFAULT_LOG_FILTER};

    #[test]
    fn test_cli_filter_wins() {
        let filter = choose_log_filter(Some("warn".to_string()), Some("trace".to_string()), "info");
        assert_eq!(filter, "warn");
    }

    #[test]
    fn test_rust_log_used_without_cli() {
        let filter = choose_log_filter(None, Some("tower_http=trace".to_string()), DEFAULT_LOG_FILTER);
        assert_eq!(filter, "tower_http=trace");
    }

    #[test]
    fn test_settings_default_used_last() {
        assert_eq!(choose_log_filter(None, None, DEBUG_LOG_FILTER), DEBUG_LOG_FILTER);
        assert_eq!(choose_log_filter(None, None, DEFAULT_LOG_FILTER), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_resolve_reads_rust_log() {
        let expected = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        assert_eq!(resolve_log_filter(None, "info"), expected);
    }
}
