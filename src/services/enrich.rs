// SPDX-License-Identifier: MIT

//! Derived-field computation for eligible activities.

use crate::models::{ClubActivity, NewActivity};
use chrono::{Local, Utc};

/// Emissions avoided per kilometer cycled instead of driven, in kg CO2.
pub const CARBON_KG_PER_KM: f64 = 0.24;

/// Carbon-saving estimate for a distance in meters.
pub fn carbon_saved_kg(distance_m: f64) -> f64 {
    distance_m / 1000.0 * CARBON_KG_PER_KM
}

/// Build the record to persist from a raw activity and its precomputed speed.
///
/// Captures the insertion timestamp in two forms, the server-local time and
/// its UTC normalization. The store keeps both columns.
pub fn enrich(activity: ClubActivity, average_speed_kmh: f64) -> NewActivity {
    let now = Utc::now();

    NewActivity {
        firstname: activity.athlete.firstname,
        lastname: activity.athlete.lastname,
        name: activity.name,
        distance: activity.distance,
        moving_time: activity.moving_time,
        elapsed_time: activity.elapsed_time,
        total_elevation_gain: activity.total_elevation_gain,
        activity_type: activity.activity_type,
        sport_type: activity.sport_type,
        workout_type: activity.workout_type,
        average_speed_kmh,
        carbon_saved_kg: carbon_saved_kg(activity.distance),
        imported_at: now.with_timezone(&Local).to_rfc3339(),
        imported_at_utc: now.to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClubAthlete;

    #[test]
    fn test_carbon_saving_for_five_km() {
        let saved = carbon_saved_kg(5000.0);
        assert!((saved - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_carbon_saving_zero_distance() {
        assert_eq!(carbon_saved_kg(0.0), 0.0);
    }

    #[test]
    fn test_enrich_carries_raw_fields_and_derived() {
        let activity = ClubActivity {
            athlete: ClubAthlete {
                firstname: "Ada".to_string(),
                lastname: "L.".to_string(),
            },
            name: "Morning Ride".to_string(),
            distance: 5000.0,
            moving_time: 900,
            elapsed_time: 950,
            total_elevation_gain: 42.0,
            activity_type: Some("Ride".to_string()),
            sport_type: "Ride".to_string(),
            workout_type: Some(10),
        };

        let record = enrich(activity, 20.0);

        assert_eq!(record.firstname, "Ada");
        assert_eq!(record.lastname, "L.");
        assert_eq!(record.distance, 5000.0);
        assert_eq!(record.moving_time, 900);
        assert_eq!(record.elapsed_time, 950);
        assert_eq!(record.average_speed_kmh, 20.0);
        assert!((record.carbon_saved_kg - 1.2).abs() < 1e-9);

        // Both timestamp forms captured, UTC one parseable back
        assert!(!record.imported_at.is_empty());
        let parsed = chrono::DateTime::parse_from_rfc3339(&record.imported_at_utc);
        assert!(parsed.is_ok());
    }
}
