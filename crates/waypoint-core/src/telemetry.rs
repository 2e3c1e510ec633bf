//! Structured logging setup.
//!
//! Library code only emits `tracing` events; applications call
//! [`init_logging`] once at startup to install a subscriber. `RUST_LOG`
//! takes precedence over the configured level when it is set.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Errors that can occur when installing the log subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// The underlying parse error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {reason}")]
    AlreadyInitialized {
        /// Why installation failed.
        reason: String,
    },
}

/// Install the global `tracing` subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if `config.level` cannot be
/// parsed and `RUST_LOG` is unset, or [`TelemetryError::AlreadyInitialized`]
/// if a subscriber was installed before.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => parse_filter(&config.level)?,
    };

    let installed = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };
    installed.map_err(|err| TelemetryError::AlreadyInitialized {
        reason: err.to_string(),
    })
}

fn parse_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
        directive: directive.to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn level_names_and_directives_parse() {
        assert!(parse_filter("info").is_ok());
        assert!(parse_filter("waypoint_core=debug,warn").is_ok());
    }

    #[test]
    fn malformed_directive_is_rejected() {
        let err = parse_filter("waypoint_core=loud").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { ref directive, .. } if directive == "waypoint_core=loud"));
    }

    #[test]
    fn second_install_fails_instead_of_panicking() {
        let config = LoggingConfig::default();
        let _first = init_logging(&config);
        assert!(matches!(
            init_logging(&config),
            Err(TelemetryError::AlreadyInitialized { .. })
        ));
    }
}
