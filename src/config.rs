//! # Bot Configuration Module
//!
//! This module defines the configuration structures for KittyBot:
//! the two image sources and the process-level settings read from the
//! environment at startup.

use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

// Constants for bot configuration
pub const TOKEN_VAR: &str = "API_TELEGRAM_KITTY";
pub const CAT_API_URL_VAR: &str = "CAT_API_URL";
pub const DOG_API_URL_VAR: &str = "DOG_API_URL";
pub const FETCH_TIMEOUT_VAR: &str = "IMAGE_FETCH_TIMEOUT_SECS";
pub const LOG_DIR_VAR: &str = "KITTYBOT_LOG_DIR";

pub const DEFAULT_CAT_API_URL: &str = "https://api.thecatapi.com/v1/images/search";
pub const DEFAULT_DOG_API_URL: &str = "https://api.thedogapi.com/v1/images/search";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_LOG_DIR: &str = "logs";

/// An upstream image-search endpoint
///
/// Built once at startup and shared read-only by every update handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    /// Endpoint answering GET with a JSON array of `{ "url": ... }` objects
    pub endpoint: String,
    /// Request timeout for a single fetch
    pub timeout: Duration,
    /// Short name used in logs ("cat", "dog")
    pub label: String,
}

impl ImageSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration, label: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
            label: label.into(),
        }
    }

    pub fn cat() -> Self {
        Self::new(
            DEFAULT_CAT_API_URL,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            "cat",
        )
    }

    pub fn dog() -> Self {
        Self::new(
            DEFAULT_DOG_API_URL,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            "dog",
        )
    }
}

/// Process configuration for KittyBot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// Preferred image source
    pub cat_source: ImageSource,
    /// Fallback image source
    pub dog_source: ImageSource,
}

impl BotConfig {
    /// Read the configuration from the process environment
    ///
    /// Call after `dotenv::dotenv()` so values from `.env` are visible.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingToken`] when the token is absent or blank
    /// - [`ConfigError::InvalidValue`] when the timeout is not a positive integer
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken(TOKEN_VAR))?;

        let timeout = match lookup(FETCH_TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        };

        let cat_endpoint = lookup(CAT_API_URL_VAR).unwrap_or_else(|| DEFAULT_CAT_API_URL.to_string());
        let dog_endpoint = lookup(DOG_API_URL_VAR).unwrap_or_else(|| DEFAULT_DOG_API_URL.to_string());

        Ok(Self {
            token,
            cat_source: ImageSource::new(cat_endpoint, timeout, "cat"),
            dog_source: ImageSource::new(dog_endpoint, timeout, "dog"),
        })
    }
}

/// Directory for log files. Read separately so logging is up before the
/// rest of the configuration is validated.
pub fn log_dir_from_env() -> String {
    env::var(LOG_DIR_VAR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        name: FETCH_TIMEOUT_VAR,
        reason: format!("{e}"),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            name: FETCH_TIMEOUT_VAR,
            reason: "timeout must be at least one second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
