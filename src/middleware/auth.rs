// SPDX-License-Identifier: MIT

//! Bearer token extraction middleware.
//!
//! The proxy keeps no session state: every authenticated route requires the
//! caller to present `Authorization: Bearer <token>`, and the token is
//! forwarded to Strava verbatim. A missing or malformed header is rejected
//! here, before any upstream call is issued.

use crate::error::AppError;
use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};

/// Bearer token presented by the caller, available to handlers via
/// request extensions.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Middleware that requires a bearer Authorization header.
pub async fn require_bearer(mut request: Request, next: Next) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") && h.len() > 7 => h[7..].to_string(),
        _ => return Err(AppError::Unauthorized),
    };

    request.extensions_mut().insert(BearerToken(token));

    Ok(next.run(request).await)
}
