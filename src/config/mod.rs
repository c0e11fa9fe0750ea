//! HTTP server configuration
//!
//! Routing behavior is fully determined by registration calls; configuration
//! covers only the connection-level knobs of the listen loop. Defaults can
//! be overridden from the environment; there is no configuration file.

use crate::errors::{HttpError, HttpResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default configuration values
pub struct HttpDefaults;

impl HttpDefaults {
    pub const KEEP_ALIVE: bool = true;
    pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Enable HTTP/1.1 keep-alive on accepted connections
    pub keep_alive: bool,
    /// How long shutdown waits for in-flight connections, in seconds
    pub shutdown_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            keep_alive: HttpDefaults::KEEP_ALIVE,
            shutdown_timeout_secs: HttpDefaults::SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl HttpConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `SPROCKET_KEEP_ALIVE`, `SPROCKET_SHUTDOWN_TIMEOUT`.
    pub fn from_env() -> HttpResult<Self> {
        let keep_alive = get_env_or_default("SPROCKET_KEEP_ALIVE", &HttpDefaults::KEEP_ALIVE.to_string())
            .parse::<bool>()
            .map_err(|_| {
                HttpError::config(format!(
                    "Invalid SPROCKET_KEEP_ALIVE '{}': expected true or false",
                    env::var("SPROCKET_KEEP_ALIVE").unwrap_or_default()
                ))
            })?;

        let shutdown_timeout_secs = get_env_or_default(
            "SPROCKET_SHUTDOWN_TIMEOUT",
            &HttpDefaults::SHUTDOWN_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|_| {
            HttpError::config(format!(
                "Invalid SPROCKET_SHUTDOWN_TIMEOUT '{}': expected a number of seconds",
                env::var("SPROCKET_SHUTDOWN_TIMEOUT").unwrap_or_default()
            ))
        })?;

        let config = HttpConfig {
            keep_alive,
            shutdown_timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> HttpResult<()> {
        if self.shutdown_timeout_secs == 0 {
            return Err(HttpError::config(
                "Shutdown timeout must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

// Helper function for environment variable handling
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Global test lock to prevent concurrent environment modifications
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn clean_test_env() {
        env::remove_var("SPROCKET_KEEP_ALIVE");
        env::remove_var("SPROCKET_SHUTDOWN_TIMEOUT");
    }

    #[test]
    fn test_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.keep_alive, HttpDefaults::KEEP_ALIVE);
        assert_eq!(
            config.shutdown_timeout_secs,
            HttpDefaults::SHUTDOWN_TIMEOUT_SECS
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_overrides() {
        let _guard = TEST_MUTEX.lock().unwrap();
        env::set_var("SPROCKET_KEEP_ALIVE", "false");
        env::set_var("SPROCKET_SHUTDOWN_TIMEOUT", "30");

        let config = HttpConfig::from_env().unwrap();
        assert!(!config.keep_alive);
        assert_eq!(config.shutdown_timeout_secs, 30);

        clean_test_env();
    }

    #[test]
    fn test_from_env_rejects_garbage() {
        let _guard = TEST_MUTEX.lock().unwrap();
        env::set_var("SPROCKET_SHUTDOWN_TIMEOUT", "soon");

        let err = HttpConfig::from_env().unwrap_err();
        assert!(matches!(err, HttpError::ConfigError { .. }));

        clean_test_env();
    }

    #[test]
    fn test_zero_shutdown_timeout_is_invalid() {
        let config = HttpConfig {
            keep_alive: true,
            shutdown_timeout_secs: 0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_helper() {
        let config = HttpConfig::default();
        assert_eq!(
            config.shutdown_timeout(),
            Duration::from_secs(HttpDefaults::SHUTDOWN_TIMEOUT_SECS)
        );
    }
}
