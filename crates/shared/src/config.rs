//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Persistent store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Retry policy for transient store failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store connection URL. Only the `memory://` scheme is supported.
    #[serde(default = "default_store_url")]
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
        }
    }
}

fn default_store_url() -> String {
    "memory://".to_string()
}

/// Caller-level retry policy for `StoreUnavailable` failures.
///
/// The engine itself never retries; retry belongs to the front end so
/// unit-of-work boundaries stay auditable.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per operation (including the first).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff between attempts, in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    50
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VAULTRA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
