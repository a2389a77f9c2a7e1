// SPDX-License-Identifier: MIT

//! Activity aggregation and bulk stream fetching.
//!
//! `list_runs` drives bounded sequential pagination against the Strava
//! client and filters the result down to runs. `fetch_streams` fans out a
//! capped set of per-activity stream calls with bounded concurrency,
//! keeping the output index-aligned with the input.

use crate::error::AppError;
use crate::models::{ActivitySummary, RawActivity, StreamSlot};
use crate::services::strava::StravaClient;
use futures_util::{stream, StreamExt};

/// Items requested per activity page.
pub const PER_PAGE: u32 = 100;

/// Hard ceiling on paginated list calls per request. This is a latency and
/// cost bound, not an error: callers get a possibly-truncated but valid
/// result instead of an unbounded-latency response.
pub const MAX_PAGES: u32 = 5;

/// Maximum activity IDs accepted in one bulk stream request.
pub const MAX_STREAM_IDS: usize = 50;

/// Concurrent in-flight stream fetches within one bulk request.
pub const STREAM_CONCURRENCY: usize = 4;

/// Result of a list-runs aggregation.
#[derive(Debug)]
pub struct RunList {
    pub runs: Vec<ActivitySummary>,
    /// True when pagination stopped at the page ceiling, meaning more
    /// activities may exist upstream.
    pub truncated: bool,
}

/// Paginate through the athlete's activities and return the runs.
///
/// Pagination is strictly sequential: whether to fetch page N+1 depends on
/// observing page N's size. Stop conditions, in order: upstream error
/// (propagated, no partial result), empty page, short page, page ceiling.
pub async fn list_runs(client: &StravaClient, bearer: &str) -> Result<RunList, AppError> {
    let mut all: Vec<RawActivity> = Vec::new();
    let mut truncated = false;

    for page in 1..=MAX_PAGES {
        let batch = client.list_activities(bearer, page, PER_PAGE).await?;
        let fetched = batch.len();
        all.extend(batch);

        tracing::debug!(page, fetched, total = all.len(), "Fetched activity page");

        if fetched == 0 || (fetched as u32) < PER_PAGE {
            // Pagination exhausted (empty page) or last page reached.
            break;
        }

        if page == MAX_PAGES {
            tracing::info!(
                total = all.len(),
                "Page ceiling reached, result may be truncated"
            );
            truncated = true;
        }
    }

    let runs: Vec<ActivitySummary> = all
        .into_iter()
        .filter(RawActivity::is_run)
        .map(RawActivity::into_summary)
        .collect();

    Ok(RunList { runs, truncated })
}

/// Fetch streams for each requested activity, preserving input order.
///
/// Policy: partial success. A failure on one ID is recorded as an error
/// marker in its own slot and the rest of the batch proceeds, so one bad ID
/// never poisons an otherwise-valid batch and the caller's index
/// correlation stays intact.
pub async fn fetch_streams(
    client: &StravaClient,
    bearer: &str,
    activity_ids: &[u64],
) -> Result<Vec<StreamSlot>, AppError> {
    if activity_ids.len() > MAX_STREAM_IDS {
        return Err(AppError::BadRequest(format!(
            "too many activity_ids: {} (maximum {})",
            activity_ids.len(),
            MAX_STREAM_IDS
        )));
    }

    // `buffered` runs up to STREAM_CONCURRENCY fetches at once but yields
    // results in input order, which keeps the slots index-aligned.
    let slots: Vec<StreamSlot> = stream::iter(activity_ids.iter().copied())
        .map(|activity_id| async move {
            match client.get_streams(bearer, activity_id).await {
                Ok(streams) => StreamSlot::Ok {
                    activity_id,
                    streams,
                },
                Err(err) => {
                    tracing::warn!(activity_id, error = %err, "Stream fetch failed");
                    StreamSlot::Error {
                        activity_id,
                        error: err.to_string(),
                    }
                }
            }
        })
        .buffered(STREAM_CONCURRENCY)
        .collect()
        .await;

    Ok(slots)
}
