//! Logging bootstrap
//!
//! The library itself only talks to the `log` facade. Applications that
//! have no logger of their own can call [`init`] once at startup.

use crate::config::LoggingConfig;
use log::info;

/// Install `env_logger` with the configured default filter.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns false when a
/// logger was already installed, which leaves the existing one in place.
pub fn init(config: &LoggingConfig) -> bool {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.level));
    if !config.timestamps {
        builder.format_timestamp(None);
    }

    match builder.try_init() {
        Ok(()) => {
            info!("📝 Logging initialized (default level: {})", config.level);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default();
        let _ = init(&config);
        assert!(!init(&config));
    }
}
