// SPDX-License-Identifier: MIT

//! Strava-Bridge API Server
//!
//! Proxies a browser frontend's Strava requests so the OAuth client secret
//! never leaves the server.

use std::sync::Arc;
use strava_bridge::{config::Config, services::StravaClient, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Strava-Bridge API");

    let strava = StravaClient::new(&config);

    let state = Arc::new(AppState {
        config: config.clone(),
        strava,
    });

    let app = strava_bridge::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured logging.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_bridge=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
