//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::TravelError;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when it is set. Calling this a
/// second time is harmless; the first subscriber stays installed.
pub fn init(logging: &LoggingConfig) -> crate::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level).map_err(|e| {
            TravelError::config(format!("Invalid log level '{}': {e}", logging.level))
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match logging.format.as_str() {
        "compact" => builder.compact().try_init(),
        _ => builder.pretty().try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_ok() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "compact".to_string(),
        };
        assert!(init(&logging).is_ok());
        assert!(init(&logging).is_ok());
    }
}
