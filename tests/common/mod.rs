// SPDX-License-Identifier: MIT

//! Shared test harness: a scriptable stub Strava server bound to an
//! ephemeral port, plus app construction wired against it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use strava_bridge::{config::Config, routes::create_router, services::StravaClient, AppState};

/// Scripted behavior for the stub Strava server.
pub struct StubBehavior {
    /// Pages served by the activities list, in order. Pages past the end
    /// of this vec are served empty.
    pub pages: Vec<Vec<serde_json::Value>>,
    /// Fail this page number with the given status and body.
    pub fail_page: Option<(u32, u16, String)>,
    /// Delay every list response (to trip the client timeout).
    pub list_delay: Option<Duration>,
    /// Serve a non-array JSON body from the list endpoint.
    pub malformed_list_body: bool,
    /// Serve a token response missing the access_token field.
    pub malformed_token_body: bool,
    /// Stream calls for these activity IDs fail with the given status.
    pub failing_streams: HashMap<u64, u16>,
    /// Stream calls for these activity IDs are delayed.
    pub slow_streams: HashMap<u64, Duration>,
    /// Token endpoint result: an access token, or a rejection.
    pub token_result: Result<String, (u16, String)>,
}

impl Default for StubBehavior {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            fail_page: None,
            list_delay: None,
            malformed_list_body: false,
            malformed_token_body: false,
            failing_streams: HashMap::new(),
            slow_streams: HashMap::new(),
            token_result: Ok("stub_access_token".to_string()),
        }
    }
}

/// Outbound call counters, one per stubbed endpoint.
#[derive(Default)]
pub struct StubCounters {
    pub list_calls: AtomicUsize,
    pub stream_calls: AtomicUsize,
    pub token_calls: AtomicUsize,
}

struct StubState {
    behavior: StubBehavior,
    counters: Arc<StubCounters>,
}

#[derive(Deserialize)]
struct ListQuery {
    page: u32,
    #[allow(dead_code)]
    per_page: u32,
}

async fn list_handler(
    State(state): State<Arc<StubState>>,
    Query(query): Query<ListQuery>,
) -> Response {
    state
        .counters
        .list_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    if let Some(delay) = state.behavior.list_delay {
        tokio::time::sleep(delay).await;
    }

    if let Some((page, status, ref body)) = state.behavior.fail_page {
        if page == query.page {
            return (
                StatusCode::from_u16(status).unwrap(),
                body.clone(),
            )
                .into_response();
        }
    }

    if state.behavior.malformed_list_body {
        return Json(serde_json::json!({"message": "ok"})).into_response();
    }

    let page = state
        .behavior
        .pages
        .get(query.page as usize - 1)
        .cloned()
        .unwrap_or_default();

    Json(serde_json::Value::Array(page)).into_response()
}

async fn streams_handler(
    State(state): State<Arc<StubState>>,
    Path(activity_id): Path<u64>,
) -> Response {
    state
        .counters
        .stream_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    if let Some(delay) = state.behavior.slow_streams.get(&activity_id) {
        tokio::time::sleep(*delay).await;
    }

    if let Some(status) = state.behavior.failing_streams.get(&activity_id) {
        return (
            StatusCode::from_u16(*status).unwrap(),
            format!("stream {} unavailable", activity_id),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "time": {"data": [0, 1, 2], "series_type": "time"},
        "latlng": {"data": [[37.0, -122.0], [37.1, -122.1]]},
        "altitude": {"data": [10.0, 12.5, 11.0]},
        "heartrate": {"data": [120, 130, 125]},
    }))
    .into_response()
}

async fn token_handler(State(state): State<Arc<StubState>>) -> Response {
    state
        .counters
        .token_calls
        .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    if state.behavior.malformed_token_body {
        return Json(serde_json::json!({"token_type": "Bearer"})).into_response();
    }

    match &state.behavior.token_result {
        Ok(token) => Json(serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
        }))
        .into_response(),
        Err((status, body)) => {
            (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response()
        }
    }
}

/// Start the stub Strava server; returns its base URL and call counters.
pub async fn spawn_stub(behavior: StubBehavior) -> (String, Arc<StubCounters>) {
    let counters = Arc::new(StubCounters::default());
    let state = Arc::new(StubState {
        behavior,
        counters: counters.clone(),
    });

    let router = Router::new()
        .route("/api/v3/athlete/activities", get(list_handler))
        .route("/api/v3/activities/{id}/streams", get(streams_handler))
        .route("/oauth/token", post(token_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), counters)
}

/// Create a test app wired against a stub upstream with the given behavior.
///
/// Timeouts are shortened so timeout scenarios run in milliseconds.
#[allow(dead_code)]
pub async fn create_test_app(behavior: StubBehavior) -> (Router, Arc<StubCounters>) {
    let (base, counters) = spawn_stub(behavior).await;

    let config = Config::test_default();
    let strava = StravaClient::new(&config)
        .with_api_base(format!("{}/api/v3", base))
        .with_token_url(format!("{}/oauth/token", base))
        .with_timeouts(Duration::from_millis(250), Duration::from_millis(250));

    let state = Arc::new(AppState { config, strava });

    (create_router(state), counters)
}

/// A run-type activity record as Strava would serve it.
#[allow(dead_code)]
pub fn run_record(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Run {}", id),
        "distance": 5000.0,
        "sport_type": "Run",
        "start_date": "2024-06-01T08:00:00Z",
    })
}

/// A non-run activity record (filtered out by the aggregator).
#[allow(dead_code)]
pub fn ride_record(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Ride {}", id),
        "distance": 20000.0,
        "sport_type": "Ride",
        "start_date": "2024-06-01T08:00:00Z",
    })
}

/// A full page of run records with sequential IDs starting at `start_id`.
#[allow(dead_code)]
pub fn full_page_of_runs(start_id: u64) -> Vec<serde_json::Value> {
    (start_id..start_id + 100).map(run_record).collect()
}

/// Read and parse a JSON response body.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 4 * 1024 * 1024)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}
