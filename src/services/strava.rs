// SPDX-License-Identifier: MIT

//! Strava API client for club activities and token refresh.
//!
//! Handles:
//! - Fetching the current page of club activities
//! - Token refresh when the API reports the access token expired
//! - A single bounded retry of the fetch after a successful refresh

use crate::error::AppError;
use crate::models::ClubActivity;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Fixed page size for the single-page club fetch.
const PER_PAGE: u32 = 30;

/// Explicit per-request timeout so a stalled upstream cannot hang a run.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Process-wide mutable access token.
///
/// A lock-guarded cell rather than a bare global: overlapping runs may both
/// trigger a refresh, and last-writer-wins is the accepted outcome. Readers
/// must tolerate the token being swapped mid-flight.
#[derive(Clone)]
pub struct TokenStore {
    inner: Arc<RwLock<String>>,
}

impl TokenStore {
    /// Seed the store with the access token from configuration.
    pub fn new(initial: String) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Snapshot of the current access token.
    pub async fn current(&self) -> String {
        self.inner.read().await.clone()
    }

    /// Replace the access token in place.
    pub async fn replace(&self, token: String) {
        *self.inner.write().await = token;
    }
}

/// Low-level Strava HTTP client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_base_urls(
            client_id,
            client_secret,
            "https://www.strava.com/api/v3".to_string(),
            "https://www.strava.com/oauth/token".to_string(),
        )
    }

    /// Client with overridden endpoints. Tests point these at a mock server.
    pub fn with_base_urls(
        client_id: String,
        client_secret: String,
        base_url: String,
        token_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token_url,
            client_id,
            client_secret,
        }
    }

    /// Fetch one page of club activities.
    pub async fn list_club_activities(
        &self,
        access_token: &str,
        club_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ClubActivity>, AppError> {
        let url = format!("{}/clubs/{}/activities", self.base_url, club_id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            // Unauthorized - token may be expired
            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// High-level Strava service: manages the shared access token and wraps the
/// club-activities fetch with the refresh-and-retry policy.
#[derive(Clone)]
pub struct StravaService {
    client: StravaClient,
    tokens: TokenStore,
    refresh_token: String,
    club_id: u64,
}

impl StravaService {
    pub fn new(
        client: StravaClient,
        tokens: TokenStore,
        refresh_token: String,
        club_id: u64,
    ) -> Self {
        Self {
            client,
            tokens,
            refresh_token,
            club_id,
        }
    }

    /// Exchange the refresh token for a new access token and swap it into
    /// the shared store.
    ///
    /// Does not retry internally; a failure only aborts the caller's current
    /// fetch attempt.
    pub async fn refresh_access_token(&self) -> Result<String, AppError> {
        match self.client.refresh_token(&self.refresh_token).await {
            Ok(tokens) => {
                self.tokens.replace(tokens.access_token.clone()).await;
                tracing::info!(expires_at = tokens.expires_at, "Access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) => {
                tracing::error!(error = %e, "Token refresh failed");
                Err(e)
            }
        }
    }

    /// Fetch the current page of club activities.
    ///
    /// A 401 triggers one token refresh and one retry; the retry budget is an
    /// explicit counter, so a persistently invalid refresh token cannot loop.
    /// Non-auth failures are logged and yield an empty list, which callers
    /// treat the same as "nothing new."
    pub async fn fetch_club_activities(&self) -> Vec<ClubActivity> {
        let mut token = self.tokens.current().await;
        let mut refreshes_left: u8 = 1;

        loop {
            match self
                .client
                .list_club_activities(&token, self.club_id, 1, PER_PAGE)
                .await
            {
                Ok(activities) => {
                    tracing::info!(count = activities.len(), "Fetched club activities");
                    return activities;
                }
                Err(e) if e.is_strava_token_error() && refreshes_left > 0 => {
                    refreshes_left -= 1;
                    tracing::info!("Access token rejected, refreshing");
                    match self.refresh_access_token().await {
                        Ok(new_token) => token = new_token,
                        // Refresh failure is already logged; give up this run.
                        Err(_) => return Vec::new(),
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Club activity fetch failed");
                    return Vec::new();
                }
            }
        }
    }
}
