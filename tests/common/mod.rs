// SPDX-License-Identifier: MIT

use club_sync::db::Database;
use club_sync::services::{StravaClient, StravaService, SyncService, TokenStore};
use serde_json::json;

/// Club ID used by all tests.
#[allow(dead_code)]
pub const TEST_CLUB_ID: u64 = 42;

/// JSON body for one club activity, as the Strava endpoint returns it.
#[allow(dead_code)]
pub fn club_activity_json(
    firstname: &str,
    lastname: &str,
    name: &str,
    distance: f64,
    moving_time: i64,
    elapsed_time: i64,
    elevation_gain: f64,
    sport_type: &str,
) -> serde_json::Value {
    json!({
        "athlete": { "firstname": firstname, "lastname": lastname },
        "name": name,
        "distance": distance,
        "moving_time": moving_time,
        "elapsed_time": elapsed_time,
        "total_elevation_gain": elevation_gain,
        "type": sport_type,
        "sport_type": sport_type,
        "workout_type": null
    })
}

/// A 20 km/h Ride (5000 m in 900 s), eligible for import.
#[allow(dead_code)]
pub fn sample_ride() -> serde_json::Value {
    club_activity_json("Ada", "Lovelace", "Morning Ride", 5000.0, 900, 950, 42.0, "Ride")
}

/// A Run from the same club; rejected by the sport-type rule.
#[allow(dead_code)]
pub fn sample_run() -> serde_json::Value {
    club_activity_json("Bob", "Runner", "Morning Run", 5000.0, 1500, 1500, 10.0, "Run")
}

/// Strava service pointed at a mock server, with the given seed token.
#[allow(dead_code)]
pub fn strava_service(server_uri: &str, access_token: &str) -> StravaService {
    strava_service_with_store(server_uri, TokenStore::new(access_token.to_string()))
}

/// Same, sharing an externally held token store.
#[allow(dead_code)]
pub fn strava_service_with_store(server_uri: &str, tokens: TokenStore) -> StravaService {
    let client = StravaClient::with_base_urls(
        "test_client_id".to_string(),
        "test_secret".to_string(),
        server_uri.to_string(),
        format!("{}/oauth/token", server_uri),
    );
    StravaService::new(client, tokens, "test_refresh_token".to_string(), TEST_CLUB_ID)
}

/// In-memory database with migrations applied.
#[allow(dead_code)]
pub async fn test_db() -> Database {
    Database::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Full pipeline wired against a mock server and an in-memory database.
#[allow(dead_code)]
pub async fn test_pipeline(server_uri: &str) -> (SyncService, Database) {
    let db = test_db().await;
    let sync = SyncService::new(strava_service(server_uri, "test_access_token"), db.clone());
    (sync, db)
}
