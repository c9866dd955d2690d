//! Tracing setup for the command-line tool.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install a stderr subscriber. `RUST_LOG` wins over `config.filter`.
///
/// Returns false when a global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_from(&config.filter));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// Parse a directive string, falling back to `warn` when it is malformed.
fn filter_from(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_valid_directives() {
        let filter = filter_from("chalkx=debug,warn");
        assert!(filter.to_string().contains("chalkx=debug"));
    }

    #[test]
    fn test_filter_from_malformed_directives() {
        let filter = filter_from("chalkx=[[");
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_init_tracing_only_once() {
        let config = LoggingConfig::default();
        init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
