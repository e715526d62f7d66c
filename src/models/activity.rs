// SPDX-License-Identifier: MIT

//! Activity models: the raw Strava payload, the enriched record the
//! pipeline builds from it, and the stored row.

use serde::{Deserialize, Serialize};

/// One entry from the Strava club-activities endpoint.
///
/// External shape, defined by Strava; not owned by this system. Club
/// activities are a reduced summary view (no activity ID, no start date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubActivity {
    /// Athlete who recorded the activity (names only)
    pub athlete: ClubAthlete,
    /// Activity name/title
    pub name: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: i64,
    /// Elapsed time in seconds
    pub elapsed_time: i64,
    /// Total elevation gain in meters
    pub total_elevation_gain: f64,
    /// Legacy activity type (Ride, Run, ...)
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    /// Sport type (Ride, MountainBikeRide, EBikeRide, ...)
    pub sport_type: String,
    /// Strava workout type code
    pub workout_type: Option<i64>,
}

/// Athlete block inside a club activity. Strava exposes only the names here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubAthlete {
    pub firstname: String,
    pub lastname: String,
}

/// A filtered and enriched activity, ready for persistence.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub firstname: String,
    pub lastname: String,
    pub name: String,
    pub distance: f64,
    pub moving_time: i64,
    pub elapsed_time: i64,
    pub total_elevation_gain: f64,
    pub activity_type: Option<String>,
    pub sport_type: String,
    pub workout_type: Option<i64>,
    /// Derived average speed in km/h
    pub average_speed_kmh: f64,
    /// Derived emissions-avoided estimate in kg CO2
    pub carbon_saved_kg: f64,
    /// Insertion time in the server's local zone (RFC 3339)
    pub imported_at: String,
    /// Insertion time normalized to UTC (RFC 3339)
    pub imported_at_utc: String,
}

/// Stored activity row, as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredActivity {
    pub id: i64,
    pub athlete_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub name: String,
    pub distance: f64,
    pub moving_time: i64,
    pub elapsed_time: i64,
    pub total_elevation_gain: f64,
    pub activity_type: Option<String>,
    pub sport_type: String,
    pub workout_type: Option<i64>,
    pub average_speed_kmh: f64,
    pub carbon_saved_kg: f64,
    pub imported_at: String,
    pub imported_at_utc: String,
}
