// SPDX-License-Identifier: MIT

//! Club-Sync: import Strava club activities into a relational store.
//!
//! This crate pulls recent activities for a fixed club, keeps the cycling
//! ones with a plausible average speed, enriches them with derived metrics
//! (average speed, carbon-saving estimate), and persists them idempotently.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::SyncService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub sync: SyncService,
}
