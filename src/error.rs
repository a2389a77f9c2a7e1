// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Strava returned status {status}: {body}")]
    UpstreamRejected { status: u16, body: String },

    #[error("Strava did not respond in time")]
    UpstreamTimeout,

    #[error("Unexpected Strava payload: {0}")]
    MalformedUpstream(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::UpstreamRejected { status, body } => {
                // Relay Strava's status where it is a valid HTTP status.
                let relayed =
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                (relayed, "strava_error", Some(body.clone()))
            }
            AppError::UpstreamTimeout => {
                (StatusCode::GATEWAY_TIMEOUT, "strava_timeout", None)
            }
            AppError::MalformedUpstream(msg) => {
                tracing::warn!(error = %msg, "Malformed Strava payload");
                (
                    StatusCode::BAD_GATEWAY,
                    "malformed_strava_payload",
                    Some(msg.clone()),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
