// SPDX-License-Identifier: MIT

//! Athlete identity model.

use serde::{Deserialize, Serialize};

/// Stored athlete row.
///
/// The club-activities payload carries no athlete ID, so identity is the
/// (firstname, lastname) pair. At most one row exists per distinct pair;
/// rows are created lazily on first observed activity and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Athlete {
    /// Generated row ID
    pub id: i64,
    /// First name as reported by Strava
    pub firstname: String,
    /// Last name as reported by Strava
    pub lastname: String,
}
