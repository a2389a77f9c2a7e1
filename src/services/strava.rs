// SPDX-License-Identifier: MIT

//! Strava API client.
//!
//! Handles:
//! - Authenticated GETs against the Strava v3 API with per-call timeouts
//! - OAuth authorization-code exchange
//! - Translating transport and status failures into `AppError`
//!
//! One attempt per call, no retries: a timed-out or failed call fails the
//! operation so worst-case latency stays bounded.

use crate::config::Config;
use crate::error::AppError;
use crate::models::RawActivity;
use serde::Deserialize;
use std::time::Duration;

/// Timeout for activity list calls.
const LIST_TIMEOUT: Duration = Duration::from_secs(10);
/// Timeout for stream calls; streams carry more data and Strava is slower
/// to assemble them.
const STREAM_TIMEOUT: Duration = Duration::from_secs(20);

/// Stream types requested for every activity.
const STREAM_KEYS: &str = "time,latlng,altitude,heartrate";

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base: String,
    authorize_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    list_timeout: Duration,
    stream_timeout: Duration,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: "https://www.strava.com/api/v3".to_string(),
            authorize_url: "https://www.strava.com/oauth/authorize".to_string(),
            token_url: "https://www.strava.com/oauth/token".to_string(),
            client_id: config.strava_client_id.clone(),
            client_secret: config.strava_client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            list_timeout: LIST_TIMEOUT,
            stream_timeout: STREAM_TIMEOUT,
        }
    }

    /// Point the client at a different API root (tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Point the client at a different token endpoint (tests).
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Override the per-call timeouts (tests).
    pub fn with_timeouts(mut self, list: Duration, stream: Duration) -> Self {
        self.list_timeout = list;
        self.stream_timeout = stream;
        self
    }

    /// Build the Strava authorization URL the browser is redirected to.
    pub fn authorize_redirect_url(&self) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope=activity:read_all",
            self.authorize_url,
            self.client_id,
            urlencoding::encode(&self.redirect_uri),
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// An empty code is rejected locally before any network call. The
    /// client secret is sent to Strava and nowhere else.
    pub async fn exchange_code(&self, code: &str) -> Result<String, AppError> {
        if code.trim().is_empty() {
            return Err(AppError::BadRequest(
                "missing authorization code".to_string(),
            ));
        }

        let response = self
            .http
            .post(&self.token_url)
            .timeout(self.list_timeout)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "Strava token exchange rejected");
            return Err(AppError::UpstreamRejected { status, body });
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::MalformedUpstream(format!("token response: {}", e))
        })?;

        Ok(token.access_token)
    }

    /// Fetch one page of the athlete's activities.
    pub async fn list_activities(
        &self,
        bearer: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RawActivity>, AppError> {
        let url = format!("{}/athlete/activities", self.api_base);

        let response = self
            .http
            .get(&url)
            .timeout(self.list_timeout)
            .bearer_auth(bearer)
            .query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        self.check_response_json(response).await
    }

    /// Fetch the time-series streams for one activity, keyed by type.
    ///
    /// The payload is passed through verbatim; this layer does not parse
    /// stream contents into domain fields.
    pub async fn get_streams(
        &self,
        bearer: &str,
        activity_id: u64,
    ) -> Result<serde_json::Value, AppError> {
        let url = format!("{}/activities/{}/streams", self.api_base, activity_id);

        let response = self
            .http
            .get(&url)
            .timeout(self.stream_timeout)
            .bearer_auth(bearer)
            .query(&[("keys", STREAM_KEYS), ("key_by_type", "true")])
            .send()
            .await
            .map_err(map_transport_error)?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "Strava API error");
            return Err(AppError::UpstreamRejected { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::MalformedUpstream(format!("JSON parse error: {}", e)))
    }
}

/// Map a reqwest transport failure into the local error contract.
///
/// A deadline miss is reported distinctly from upstream-reported errors so
/// the boundary can answer 504 instead of relaying a status Strava never
/// sent.
fn map_transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::UpstreamTimeout
    } else {
        AppError::Internal(anyhow::anyhow!("Strava request failed: {}", err))
    }
}

/// Token exchange response from Strava OAuth.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}
