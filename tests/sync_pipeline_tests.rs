// SPDX-License-Identifier: MIT

//! End-to-end pipeline runs: fetch, filter, enrich, persist with dedup.

mod common;

use common::{club_activity_json, sample_ride, sample_run, test_pipeline};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACTIVITIES_PATH: &str = "/clubs/42/activities";

async fn mount_activities(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(ACTIVITIES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn ride_is_persisted_and_run_is_rejected() {
    let server = MockServer::start().await;
    mount_activities(&server, json!([sample_ride(), sample_run()])).await;

    let (sync, db) = test_pipeline(&server.uri()).await;
    let summary = sync.run().await;

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.duplicates, 0);
    assert_eq!(summary.failed, 0);

    // Only the Ride reached the store, with its derived fields.
    let stored = db.list_activities().await.expect("list");
    assert_eq!(stored.len(), 1);
    let ride = &stored[0];
    assert_eq!(ride.firstname, "Ada");
    assert_eq!(ride.lastname, "Lovelace");
    assert_eq!(ride.sport_type, "Ride");
    assert_eq!(ride.distance, 5000.0);
    assert_eq!(ride.moving_time, 900);
    assert_eq!(ride.average_speed_kmh, 20.0);
    assert!((ride.carbon_saved_kg - 1.2).abs() < 1e-9);
    assert!(!ride.imported_at.is_empty());
    assert!(!ride.imported_at_utc.is_empty());

    // The rejected Run left no trace, not even an athlete row.
    assert_eq!(db.count_athletes().await.expect("count"), 1);
}

#[tokio::test]
async fn second_run_reports_duplicates_and_inserts_nothing() {
    let server = MockServer::start().await;
    mount_activities(&server, json!([sample_ride()])).await;

    let (sync, db) = test_pipeline(&server.uri()).await;

    let first = sync.run().await;
    assert_eq!(first.inserted, 1);
    assert_eq!(first.duplicates, 0);

    let second = sync.run().await;
    assert_eq!(second.inserted, 0);
    assert_eq!(second.duplicates, 1);

    assert_eq!(db.list_activities().await.expect("list").len(), 1);
}

#[tokio::test]
async fn same_athlete_resolves_to_one_row() {
    let server = MockServer::start().await;
    mount_activities(
        &server,
        json!([
            club_activity_json("Ada", "Lovelace", "Commute", 5000.0, 900, 950, 12.0, "Ride"),
            club_activity_json("Ada", "Lovelace", "Evening Loop", 8000.0, 1600, 1700, 30.0, "GravelRide"),
        ]),
    )
    .await;

    let (sync, db) = test_pipeline(&server.uri()).await;
    let summary = sync.run().await;

    assert_eq!(summary.inserted, 2);
    assert_eq!(db.count_athletes().await.expect("count"), 1);

    let stored = db.list_activities().await.expect("list");
    assert_eq!(stored[0].athlete_id, stored[1].athlete_id);
}

#[tokio::test]
async fn empty_fetch_reports_nothing_to_do() {
    let server = MockServer::start().await;
    mount_activities(&server, json!([])).await;

    let (sync, db) = test_pipeline(&server.uri()).await;
    let summary = sync.run().await;

    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.inserted, 0);
    assert!(db.list_activities().await.expect("list").is_empty());
    assert_eq!(db.count_athletes().await.expect("count"), 0);
}

#[tokio::test]
async fn implausible_speeds_are_rejected_end_to_end() {
    let server = MockServer::start().await;
    mount_activities(
        &server,
        json!([
            // 72 km/h: not plausible on a bike
            club_activity_json("Fast", "Eddy", "Downhill", 18000.0, 900, 900, 0.0, "Ride"),
            // Zero moving time: speed undefined
            club_activity_json("Idle", "Rider", "Glitch", 1000.0, 0, 0, 0.0, "Ride"),
        ]),
    )
    .await;

    let (sync, db) = test_pipeline(&server.uri()).await;
    let summary = sync.run().await;

    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.rejected, 2);
    assert_eq!(summary.inserted, 0);
    assert!(db.list_activities().await.expect("list").is_empty());
}
