//! Shared configuration structures.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Load `.env` from the working directory, if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Read an environment variable, falling back to `default` when unset.
pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to `default` when
/// unset or unparsable.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Base service configuration shared by all binaries.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name for logging and tracing
    pub service_name: String,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: env_or("SERVICE_NAME", &defaults.service_name),
            log_level: env_or("LOG_LEVEL", &defaults.log_level),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "usermgmt".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_parse_falls_back_on_garbage() {
        env::set_var("COMMON_TEST_PORT", "not-a-number");
        assert_eq!(env_parse("COMMON_TEST_PORT", 587u16), 587);
        env::set_var("COMMON_TEST_PORT", "2525");
        assert_eq!(env_parse("COMMON_TEST_PORT", 587u16), 2525);
        env::remove_var("COMMON_TEST_PORT");
    }

    #[test]
    fn test_service_config_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.log_level, "info");
    }
}
