// SPDX-License-Identifier: MIT

//! Eligibility rules for imported club activities.
//!
//! Rules are applied in order and short-circuit: sport type first, then
//! average-speed plausibility. The computed speed is returned so the
//! enricher does not recompute it.

use crate::models::ClubActivity;
use std::fmt;

/// Cycling sport types that qualify for import.
pub const ALLOWED_SPORT_TYPES: [&str; 6] = [
    "Ride",
    "MountainBikeRide",
    "GravelRide",
    "EBikeRide",
    "EMountainBikeRide",
    "Velomobile",
];

/// Plausible average-speed window in km/h. Both bounds are inclusive.
pub const MIN_SPEED_KMH: f64 = 5.0;
pub const MAX_SPEED_KMH: f64 = 35.0;

/// Why an activity was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// Sport type outside the cycling allow-list
    SportType(String),
    /// Zero moving time; average speed is undefined
    NoMovingTime,
    /// Average speed outside the plausible window
    ImplausibleSpeed(f64),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::SportType(t) => write!(f, "sport type {} not allowed", t),
            Rejection::NoMovingTime => write!(f, "zero moving time"),
            Rejection::ImplausibleSpeed(s) => {
                write!(f, "implausible average speed {:.1} km/h", s)
            }
        }
    }
}

/// Average speed in km/h, or `None` when moving time is not positive.
pub fn average_speed_kmh(distance_m: f64, moving_time_s: i64) -> Option<f64> {
    if moving_time_s <= 0 {
        return None;
    }
    Some(distance_m * 3.6 / moving_time_s as f64)
}

/// Check an activity against the import rules.
///
/// Returns the computed average speed on success.
pub fn check(activity: &ClubActivity) -> Result<f64, Rejection> {
    if !ALLOWED_SPORT_TYPES.contains(&activity.sport_type.as_str()) {
        return Err(Rejection::SportType(activity.sport_type.clone()));
    }

    let speed = average_speed_kmh(activity.distance, activity.moving_time)
        .ok_or(Rejection::NoMovingTime)?;

    if !(MIN_SPEED_KMH..=MAX_SPEED_KMH).contains(&speed) {
        return Err(Rejection::ImplausibleSpeed(speed));
    }

    Ok(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClubAthlete;

    fn ride(sport_type: &str, distance: f64, moving_time: i64) -> ClubActivity {
        ClubActivity {
            athlete: ClubAthlete {
                firstname: "Jo".to_string(),
                lastname: "D.".to_string(),
            },
            name: "Commute".to_string(),
            distance,
            moving_time,
            elapsed_time: moving_time,
            total_elevation_gain: 10.0,
            activity_type: Some("Ride".to_string()),
            sport_type: sport_type.to_string(),
            workout_type: None,
        }
    }

    #[test]
    fn test_disallowed_sport_type_rejected() {
        // 20 km/h, otherwise perfectly plausible
        let activity = ride("Run", 5000.0, 900);
        assert_eq!(
            check(&activity),
            Err(Rejection::SportType("Run".to_string()))
        );

        let activity = ride("Swim", 5000.0, 900);
        assert!(check(&activity).is_err());
    }

    #[test]
    fn test_all_cycling_variants_allowed() {
        for sport_type in ALLOWED_SPORT_TYPES {
            let activity = ride(sport_type, 5000.0, 900);
            assert_eq!(check(&activity), Ok(20.0), "{} should pass", sport_type);
        }
    }

    #[test]
    fn test_zero_moving_time_rejected() {
        let activity = ride("Ride", 5000.0, 0);
        assert_eq!(check(&activity), Err(Rejection::NoMovingTime));
    }

    #[test]
    fn test_speed_bounds_inclusive() {
        // Exactly 5.0 km/h: 5000 m in 3600 s
        let activity = ride("Ride", 5000.0, 3600);
        assert_eq!(check(&activity), Ok(5.0));

        // Exactly 35.0 km/h: 35000 m in 3600 s
        let activity = ride("Ride", 35000.0, 3600);
        assert_eq!(check(&activity), Ok(35.0));
    }

    #[test]
    fn test_speed_outside_bounds_rejected() {
        // 4.99 km/h
        let activity = ride("Ride", 4990.0, 3600);
        assert!(matches!(
            check(&activity),
            Err(Rejection::ImplausibleSpeed(_))
        ));

        // 35.01 km/h
        let activity = ride("Ride", 35010.0, 3600);
        assert!(matches!(
            check(&activity),
            Err(Rejection::ImplausibleSpeed(_))
        ));
    }

    #[test]
    fn test_average_speed_computation() {
        assert_eq!(average_speed_kmh(5000.0, 900), Some(20.0));
        assert_eq!(average_speed_kmh(5000.0, 0), None);
        assert_eq!(average_speed_kmh(5000.0, -1), None);
    }
}
