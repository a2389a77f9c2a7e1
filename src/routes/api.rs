// SPDX-License-Identifier: MIT

//! API routes for authenticated callers.
//!
//! Both routes require a bearer Authorization header; the middleware in
//! routes/mod.rs rejects requests without one before these handlers run.

use crate::error::Result;
use crate::middleware::BearerToken;
use crate::models::StreamSlot;
use crate::services::activities;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Header signaling that the activity list stopped at the page ceiling and
/// more activities may exist upstream.
pub const TRUNCATED_HEADER: &str = "x-result-truncated";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(get_activities))
        .route("/api/streams", post(post_streams))
}

/// List the caller's runs, paginated and filtered server-side.
///
/// The body is a plain JSON array of summaries; truncation by the page
/// ceiling is reported out-of-band via the `X-Result-Truncated` header so
/// the array shape stays stable for existing clients.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
) -> Result<Response> {
    let result = activities::list_runs(&state.strava, &token.0).await?;

    tracing::debug!(
        runs = result.runs.len(),
        truncated = result.truncated,
        "Returning run list"
    );

    let mut response = Json(result.runs).into_response();
    if result.truncated {
        response.headers_mut().insert(
            HeaderName::from_static(TRUNCATED_HEADER),
            HeaderValue::from_static("true"),
        );
    }

    Ok(response)
}

#[derive(Deserialize)]
struct StreamsRequest {
    activity_ids: Vec<u64>,
}

/// Fetch time-series streams for a batch of activities.
///
/// The response array is index-aligned with `activity_ids`; failed fetches
/// occupy their slot as error markers.
async fn post_streams(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<BearerToken>,
    Json(request): Json<StreamsRequest>,
) -> Result<Json<Vec<StreamSlot>>> {
    tracing::debug!(
        count = request.activity_ids.len(),
        "Fetching activity streams"
    );

    let slots =
        activities::fetch_streams(&state.strava, &token.0, &request.activity_ids).await?;

    Ok(Json(slots))
}
