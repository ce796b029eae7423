//! Client configuration loading from environment variables.
//!
//! # Environment Variables
//!
//! ## Required Variables
//! - `INTERACTION_API_URL`: Base URL of the interaction REST pass-through
//!
//! ## Optional Variables
//! - `RUST_LOG`: Logging level (default: "info,voicenote_sync=debug")
//! - `INTERACTION_API_TOKEN`: Bearer token sent with every request
//! - `INTERACTION_USER_ID`: Signed-in viewer; unset means anonymous
//! - `BATCH_SIZE`: Status reads per batch window (default: 5)
//! - `BATCH_DELAY_MS`: Pause between batch windows (default: 100)
//! - `REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 10)

use crate::application::batch::SchedulerConfig;
use crate::application::batch::config::{DEFAULT_BATCH_DELAY_MS, DEFAULT_BATCH_SIZE};
use crate::domain::session::Session;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL for the interaction API (e.g., `https://api.example.com/v1`)
    pub api_url: String,

    /// Bearer token for the interaction API
    pub api_token: Option<String>,

    /// Signed-in viewer id
    pub user_id: Option<String>,

    /// Maximum status reads dispatched per batch window
    pub batch_size: usize,

    /// Milliseconds to wait between batch windows
    pub batch_delay_ms: u64,

    /// Timeout applied to each HTTP request
    pub request_timeout_seconds: u64,
}

impl SyncConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `INTERACTION_API_URL` is missing or an optional
    /// variable is set but cannot be parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_url: env_required("INTERACTION_API_URL")?,
            api_token: env_optional("INTERACTION_API_TOKEN"),
            user_id: env_optional("INTERACTION_USER_ID"),
            batch_size: env_or("BATCH_SIZE", DEFAULT_BATCH_SIZE)?,
            batch_delay_ms: env_or("BATCH_DELAY_MS", DEFAULT_BATCH_DELAY_MS)?,
            request_timeout_seconds: env_or("REQUEST_TIMEOUT_SECONDS", 10)?,
        })
    }

    pub fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.batch_size, Duration::from_millis(self.batch_delay_ms))
    }

    pub fn session(&self) -> Session {
        Session {
            user_id: self.user_id.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.max(1))
    }
}

/// Load a required environment variable.
fn env_required(key: &str) -> anyhow::Result<String> {
    std::env::var(key).map_err(|_| anyhow::anyhow!("Missing required environment variable: {}", key))
}

/// Load an optional variable, treating blank values as unset.
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load an environment variable with a default value.
///
/// # Errors
///
/// Returns an error if the variable is set but cannot be parsed.
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
