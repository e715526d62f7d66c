// SPDX-License-Identifier: MIT

//! Service layer: Strava client, filter/enrichment rules, and the pipeline.

pub mod enrich;
pub mod filter;
pub mod strava;
pub mod sync;

pub use strava::{StravaClient, StravaService, TokenStore};
pub use sync::{SyncService, SyncSummary};
