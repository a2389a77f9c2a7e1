// SPDX-License-Identifier: MIT

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
}

/// Start the OAuth flow - redirect the browser to Strava authorization.
async fn login(State(state): State<Arc<AppState>>) -> Redirect {
    let auth_url = state.strava.authorize_redirect_url();

    tracing::info!(
        client_id = %state.config.strava_client_id,
        "Starting OAuth flow, redirecting to Strava"
    );

    Redirect::temporary(&auth_url)
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth redirect target - exchange the authorization code for a token.
///
/// On success the browser is sent back to the root page with the token in
/// the URL fragment, where the frontend stores it client-side. The token is
/// never retained here.
async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Strava");
        return Err(AppError::BadRequest(format!("OAuth error: {}", error)));
    }

    let code = params.code.unwrap_or_default();

    tracing::info!("Exchanging authorization code for access token");
    // A rejected exchange always answers 400 regardless of what status the
    // token endpoint returned; status relaying is for the API routes.
    let access_token = match state.strava.exchange_code(&code).await {
        Ok(token) => token,
        Err(AppError::UpstreamRejected { status, body }) => {
            tracing::warn!(status, "Strava rejected the authorization code");
            return Err(AppError::BadRequest(format!(
                "token exchange rejected: {}",
                body
            )));
        }
        Err(err) => return Err(err),
    };

    let redirect_url = format!(
        "/#access_token={}",
        urlencoding::encode(&access_token)
    );

    Ok(Redirect::temporary(&redirect_url))
}
