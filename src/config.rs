// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! All values are read once at startup and treated as immutable for the
//! lifetime of the process. The only piece of mutable credential state is
//! the access token, which lives in `services::strava::TokenStore`.

use std::env;

/// Default sync cadence: every 15 minutes.
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 15 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Initial access token (seed for the shared token store)
    pub strava_access_token: String,
    /// Long-lived refresh token, exchanged for new access tokens
    pub strava_refresh_token: String,
    /// Club whose activities are imported
    pub strava_club_id: u64,
    /// Database connection string (e.g. `sqlite:club_sync.db`)
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Seconds between scheduled pipeline runs
    pub sync_interval_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_access_token: "test_access_token".to_string(),
            strava_refresh_token: "test_refresh_token".to_string(),
            strava_club_id: 42,
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            sync_interval_secs: DEFAULT_SYNC_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_access_token: env::var("STRAVA_ACCESS_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_ACCESS_TOKEN"))?,
            strava_refresh_token: env::var("STRAVA_REFRESH_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_REFRESH_TOKEN"))?,
            strava_club_id: env::var("STRAVA_CLUB_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLUB_ID"))?
                .parse()
                .map_err(|_| ConfigError::Invalid("STRAVA_CLUB_ID"))?,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            sync_interval_secs: env::var("SYNC_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SYNC_INTERVAL_SECS),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
