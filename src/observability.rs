//! Tracing subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

pub const DEFAULT_FILTER: &str = "info,quizgen=debug,tower_http=info";

/// Filter from `RUST_LOG`, else the configured directive, else the default
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = config.filter.as_deref().unwrap_or(DEFAULT_FILTER);
        EnvFilter::try_new(directive).unwrap_or_else(|e| {
            eprintln!("Warning: invalid log filter {:?}: {}", directive, e);
            EnvFilter::new(DEFAULT_FILTER)
        })
    })
}

/// Install the global subscriber, writing to stderr so CLI output stays
/// clean on stdout. Safe to call more than once.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = env_filter(config);

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!(json = config.json, "tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        let config = LoggingConfig::default();
        init_tracing(&config);
        init_tracing(&config);
    }

    #[test]
    fn test_invalid_filter_falls_back() {
        let config = LoggingConfig {
            json: false,
            filter: Some("quizgen=notalevel".to_string()),
        };
        // Falls back instead of panicking
        let _ = env_filter(&config);
    }
}
