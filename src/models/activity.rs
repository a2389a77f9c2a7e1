// SPDX-License-Identifier: MIT

//! Activity records exchanged with Strava and with the frontend.

use serde::{Deserialize, Serialize};

/// Sport types that count as runs.
pub const RUN_SPORT_TYPES: [&str; 3] = ["Run", "TrailRun", "VirtualRun"];

/// Raw activity record as returned by Strava's list endpoint.
///
/// Lenient on purpose: `name` and `sport_type` are occasionally absent
/// upstream and must not fail deserialization of the whole page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawActivity {
    pub id: u64,
    pub name: Option<String>,
    #[serde(default)]
    pub distance: f64,
    pub sport_type: Option<String>,
    #[serde(default)]
    pub start_date: String,
}

impl RawActivity {
    /// Whether this record's sport type is in the run allow-set.
    pub fn is_run(&self) -> bool {
        self.sport_type
            .as_deref()
            .is_some_and(|s| RUN_SPORT_TYPES.contains(&s))
    }

    /// Project into the summary shape served to the frontend.
    pub fn into_summary(self) -> ActivitySummary {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Activity {}", self.id));

        ActivitySummary {
            id: self.id,
            name,
            distance: self.distance,
            sport_type: self.sport_type.unwrap_or_default(),
            start_date: self.start_date,
        }
    }
}

/// Summary activity served on the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ActivitySummary {
    pub id: u64,
    pub name: String,
    pub distance: f64,
    pub sport_type: String,
    pub start_date: String,
}

/// One slot of a bulk stream response.
///
/// Slots are index-aligned with the requested activity IDs; a failed fetch
/// occupies its slot as an error marker rather than being dropped.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StreamSlot {
    Ok {
        activity_id: u64,
        /// Verbatim Strava stream payload, keyed by stream type.
        streams: serde_json::Value,
    },
    Error {
        activity_id: u64,
        error: String,
    },
}
