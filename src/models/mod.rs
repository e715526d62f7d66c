// SPDX-License-Identifier: MIT

//! Data models for upstream payloads and stored records.

pub mod activity;
pub mod athlete;

pub use activity::{ClubActivity, ClubAthlete, NewActivity, StoredActivity};
pub use athlete::Athlete;
