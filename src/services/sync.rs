// SPDX-License-Identifier: MIT

//! Pipeline orchestrator.
//!
//! Composes one import pass: fetch club activities, filter, enrich, persist
//! with dedup. The periodic scheduler and the on-demand `/sync` route both
//! drive the same service; overlapping runs are tolerated (the dedup index
//! in `db` keeps the race benign).

use crate::db::{Database, PersistOutcome};
use crate::services::strava::StravaService;
use crate::services::{enrich, filter};
use serde::Serialize;

/// Outcome counts for one pipeline run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SyncSummary {
    /// Activities returned by the upstream fetch
    pub fetched: usize,
    /// New rows written
    pub inserted: usize,
    /// Already-imported activities skipped
    pub duplicates: usize,
    /// Activities rejected by the filter rules
    pub rejected: usize,
    /// Per-activity persistence failures
    pub failed: usize,
}

/// Runs one full import pass per invocation.
#[derive(Clone)]
pub struct SyncService {
    strava: StravaService,
    db: Database,
}

impl SyncService {
    pub fn new(strava: StravaService, db: Database) -> Self {
        Self { strava, db }
    }

    /// One pipeline run.
    ///
    /// A failure on one activity is logged and the batch continues; the run
    /// itself always completes with a summary.
    pub async fn run(&self) -> SyncSummary {
        let activities = self.strava.fetch_club_activities().await;
        let mut summary = SyncSummary {
            fetched: activities.len(),
            ..Default::default()
        };

        if activities.is_empty() {
            tracing::info!("No club activities fetched, nothing to do");
            return summary;
        }

        for activity in activities {
            let speed = match filter::check(&activity) {
                Ok(speed) => speed,
                Err(reason) => {
                    tracing::info!(name = %activity.name, %reason, "Activity rejected");
                    summary.rejected += 1;
                    continue;
                }
            };

            let record = enrich::enrich(activity, speed);

            match self.db.persist_activity(&record).await {
                Ok(PersistOutcome::Inserted) => summary.inserted += 1,
                Ok(PersistOutcome::Duplicate) => summary.duplicates += 1,
                Err(e) => {
                    tracing::error!(name = %record.name, error = %e, "Failed to persist activity");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            fetched = summary.fetched,
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            rejected = summary.rejected,
            failed = summary.failed,
            "Sync run complete"
        );

        summary
    }
}
