// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod activities;
pub mod strava;

pub use activities::RunList;
pub use strava::StravaClient;
