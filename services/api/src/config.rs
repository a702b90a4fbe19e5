//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use interview_coach_core::{GatewaySettings, SessionSettings};
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub openai_api_key: String,
    pub generation_model: String,
    pub question_count: usize,
    pub rating_scale: u32,
    pub generation_timeout: Duration,
    pub retry_backoff: Duration,
    pub session_ttl: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Server Settings ---
        let bind_address = parse_or(&lookup, "BIND_ADDRESS", "0.0.0.0:3000")?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Generation Backend ---
        let openai_api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;
        let generation_model =
            lookup("GENERATION_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let timeout_secs: u64 = parse_or(&lookup, "GENERATION_TIMEOUT_SECS", "30")?;
        let backoff_ms: u64 = parse_or(&lookup, "GENERATION_RETRY_BACKOFF_MS", "500")?;

        // --- Interview Settings ---
        let question_count: usize = parse_or(&lookup, "QUESTION_COUNT", "2")?;
        if question_count == 0 {
            return Err(ConfigError::InvalidValue(
                "QUESTION_COUNT".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let rating_scale: u32 = parse_or(&lookup, "RATING_SCALE", "10")?;
        if rating_scale == 0 {
            return Err(ConfigError::InvalidValue(
                "RATING_SCALE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let session_ttl_secs: u64 = parse_or(&lookup, "SESSION_TTL_SECS", "3600")?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            bind_address,
            log_level,
            openai_api_key,
            generation_model,
            question_count,
            rating_scale,
            generation_timeout: Duration::from_secs(timeout_secs),
            retry_backoff: Duration::from_millis(backoff_ms),
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            request_timeout: self.generation_timeout,
            retry_transient: true,
            retry_backoff: self.retry_backoff,
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            question_count: self.question_count,
            rating_scale: self.rating_scale,
        }
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}
