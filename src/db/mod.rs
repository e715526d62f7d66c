// SPDX-License-Identifier: MIT

//! SQLite persistence gateway.
//!
//! Owns the two tables (`athletes`, `activities`) and the idempotent
//! import path: resolve-or-create the athlete, then insert the activity
//! only if no equivalent row exists. Equivalence is the five-field dedup
//! key (athlete, distance, moving time, elapsed time, elevation gain).
//! A UNIQUE index over that key backs the check, so two overlapping runs
//! racing past the lookup still cannot produce a duplicate row; the loser
//! sees a constraint violation, which maps to the duplicate outcome.

use crate::error::{AppError, Result};
use crate::models::{Athlete, NewActivity, StoredActivity};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

/// Outcome of persisting one enriched activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    /// A new row was written.
    Inserted,
    /// An equivalent activity was already stored; nothing was written.
    Duplicate,
}

/// Database handle with connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and run migrations.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Create an in-memory database for tests.
    ///
    /// Pinned to a single connection: every SQLite `:memory:` connection
    /// is its own database, so a larger pool would see empty tables.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Reference to the underlying pool, for operations outside the
    /// gateway's own methods.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if they do not exist.
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS athletes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                firstname TEXT NOT NULL,
                lastname TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // One row per name pair; closes the resolve-or-create race the same
        // way the activity dedup index does.
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_athletes_name ON athletes(firstname, lastname)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                athlete_id INTEGER NOT NULL REFERENCES athletes(id),
                firstname TEXT NOT NULL,
                lastname TEXT NOT NULL,
                name TEXT NOT NULL,
                distance REAL NOT NULL,
                moving_time INTEGER NOT NULL,
                elapsed_time INTEGER NOT NULL,
                total_elevation_gain REAL NOT NULL,
                activity_type TEXT,
                sport_type TEXT NOT NULL,
                workout_type INTEGER,
                average_speed_kmh REAL NOT NULL,
                carbon_saved_kg REAL NOT NULL,
                imported_at TEXT NOT NULL,
                imported_at_utc TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        // Dedup key; makes the check-then-insert race benign.
        sqlx::query(
            r"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_activities_dedup
            ON activities(athlete_id, distance, moving_time, elapsed_time, total_elevation_gain)
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up an athlete by exact name pair.
    pub async fn find_athlete(&self, firstname: &str, lastname: &str) -> Result<Option<Athlete>> {
        let athlete = sqlx::query_as::<_, Athlete>(
            "SELECT id, firstname, lastname FROM athletes WHERE firstname = ? AND lastname = ?",
        )
        .bind(firstname)
        .bind(lastname)
        .fetch_optional(&self.pool)
        .await?;
        Ok(athlete)
    }

    /// Look up an athlete by exact name pair, creating the row if absent.
    ///
    /// Returns the athlete's row ID. Athletes are never updated or deleted
    /// by the pipeline.
    pub async fn resolve_athlete(&self, firstname: &str, lastname: &str) -> Result<i64> {
        if let Some(athlete) = self.find_athlete(firstname, lastname).await? {
            return Ok(athlete.id);
        }

        let result = sqlx::query("INSERT INTO athletes (firstname, lastname) VALUES (?, ?)")
            .bind(firstname)
            .bind(lastname)
            .execute(&self.pool)
            .await;

        match result {
            Ok(res) => {
                let id = res.last_insert_rowid();
                tracing::info!(firstname, lastname, athlete_id = id, "New athlete stored");
                Ok(id)
            }
            // A concurrent run created the athlete between our lookup and here.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!(firstname, lastname, "Concurrent athlete insert, re-reading");
                match self.find_athlete(firstname, lastname).await? {
                    Some(athlete) => Ok(athlete.id),
                    None => Err(AppError::Database(
                        "athlete row missing after unique violation".to_string(),
                    )),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist one enriched activity, skipping if an equivalent row exists.
    pub async fn persist_activity(&self, activity: &NewActivity) -> Result<PersistOutcome> {
        let athlete_id = self
            .resolve_athlete(&activity.firstname, &activity.lastname)
            .await?;

        let existing = sqlx::query(
            r"
            SELECT id FROM activities
            WHERE athlete_id = ?
              AND distance = ?
              AND moving_time = ?
              AND elapsed_time = ?
              AND total_elevation_gain = ?
            ",
        )
        .bind(athlete_id)
        .bind(activity.distance)
        .bind(activity.moving_time)
        .bind(activity.elapsed_time)
        .bind(activity.total_elevation_gain)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            tracing::info!(
                name = %activity.name,
                athlete_id,
                "Activity already imported, skipping"
            );
            return Ok(PersistOutcome::Duplicate);
        }

        let insert = sqlx::query(
            r"
            INSERT INTO activities (
                athlete_id, firstname, lastname, name,
                distance, moving_time, elapsed_time, total_elevation_gain,
                activity_type, sport_type, workout_type,
                average_speed_kmh, carbon_saved_kg,
                imported_at, imported_at_utc
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(athlete_id)
        .bind(&activity.firstname)
        .bind(&activity.lastname)
        .bind(&activity.name)
        .bind(activity.distance)
        .bind(activity.moving_time)
        .bind(activity.elapsed_time)
        .bind(activity.total_elevation_gain)
        .bind(&activity.activity_type)
        .bind(&activity.sport_type)
        .bind(activity.workout_type)
        .bind(activity.average_speed_kmh)
        .bind(activity.carbon_saved_kg)
        .bind(&activity.imported_at)
        .bind(&activity.imported_at_utc)
        .execute(&self.pool)
        .await;

        match insert {
            Ok(_) => {
                tracing::info!(
                    name = %activity.name,
                    athlete_id,
                    carbon_saved_kg = activity.carbon_saved_kg,
                    "Activity stored"
                );
                Ok(PersistOutcome::Inserted)
            }
            // A concurrent run won the insert between our lookup and here.
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::info!(
                    name = %activity.name,
                    athlete_id,
                    "Concurrent import detected, skipping"
                );
                Ok(PersistOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All stored activities, oldest first. Used by tests and diagnostics.
    pub async fn list_activities(&self) -> Result<Vec<StoredActivity>> {
        let rows = sqlx::query_as::<_, StoredActivity>("SELECT * FROM activities ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Number of stored athletes.
    pub async fn count_athletes(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM athletes")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }
}
