// SPDX-License-Identifier: MIT

//! Club-Sync API Server
//!
//! Imports recent Strava club activities on a fixed cadence and on demand,
//! persisting eligible cycling activities with derived metrics.

use club_sync::{
    config::Config,
    db::Database,
    services::{StravaClient, StravaService, SyncService, TokenStore},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(
        port = config.port,
        club_id = config.strava_club_id,
        "Starting Club-Sync API"
    );

    // Initialize database (runs migrations)
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database ready");

    // Shared access token, seeded from configuration
    let tokens = TokenStore::new(config.strava_access_token.clone());

    let client = StravaClient::new(
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
    );
    let strava = StravaService::new(
        client,
        tokens,
        config.strava_refresh_token.clone(),
        config.strava_club_id,
    );
    let sync = SyncService::new(strava, db.clone());

    // Periodic trigger; the /sync route drives the same service on demand.
    // The first tick fires immediately, so one import runs at startup before
    // the cadence settles in.
    let scheduled = sync.clone();
    let interval_secs = config.sync_interval_secs;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            scheduled.run().await;
        }
    });
    tracing::info!(interval_secs, "Scheduler started");

    // Build shared state and router
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        sync,
    });
    let app = club_sync::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("club_sync=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
