// SPDX-License-Identifier: MIT

//! Strava-Bridge: server-side proxy between a browser frontend and the
//! Strava API.
//!
//! Keeps the OAuth client secret off the browser while exposing a small
//! authenticated surface: a run-filtered activity list (bounded
//! pagination) and bulk per-activity stream fetching.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::StravaClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub strava: StravaClient,
}
