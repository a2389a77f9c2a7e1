// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod activity;

pub use activity::{ActivitySummary, RawActivity, StreamSlot};
