//! Token Server Configuration
//!
//! Loaded from environment variables. The signing key and secret are
//! required; the process must refuse to start without them.

use thiserror::Error;

/// Configuration errors. Any of these is fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid port value: {0}")]
    InvalidPort(String),
}

/// Server-held configuration for minting join tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Realtime server URL handed back to clients
    pub server_url: String,
    /// API key, used as the token issuer
    pub api_key: String,
    /// API secret, used as the HS256 signing key
    pub api_secret: String,
    /// HTTP listen port
    pub port: u16,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
}

impl TokenConfig {
    /// Load configuration from the environment.
    ///
    /// Environment variables:
    /// - `RTC_SERVER_URL`: realtime server URL (required)
    /// - `RTC_API_KEY`: credential key (required)
    /// - `RTC_API_SECRET`: credential secret (required)
    /// - `PORT`: HTTP listen port (default: 3000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url = require_var("RTC_SERVER_URL")?;
        let api_key = require_var("RTC_API_KEY")?;
        let api_secret = require_var("RTC_API_SECRET")?;
        let port = parse_port(std::env::var("PORT").ok())?;

        Ok(Self {
            server_url,
            api_key,
            api_secret,
            port,
            token_ttl_hours: 6,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn parse_port(value: Option<String>) -> Result<u16, ConfigError> {
    match value {
        Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw)),
        None => Ok(3000),
    }
}
