// SPDX-License-Identifier: MIT

//! HTTP route handlers.

use crate::error::Result;
use crate::models::StoredActivity;
use crate::services::SyncSummary;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness check, independent of the pipeline.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Run one pipeline pass on demand.
///
/// The external contract is based solely on whether anything was fetched:
/// 200 when the upstream returned activities, 500 otherwise. The body
/// carries the full per-run counts either way.
async fn trigger_sync(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SyncSummary>) {
    let summary = state.sync.run().await;

    let status = if summary.fetched > 0 {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(summary))
}

/// List all imported activities, oldest first.
async fn list_activities(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StoredActivity>>> {
    let activities = state.db.list_activities().await?;
    Ok(Json(activities))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/sync", post(trigger_sync))
        .route("/activities", get(list_activities))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
