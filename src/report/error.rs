// Error taxonomy for the report engine.
//
// PlanError covers bad configuration and is raised before any store
// access. QueryError covers store failures mid-pagination. ReportError is
// the job-level union surfaced to the scheduler; sink failures keep their
// cause attached.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Invalid window or threshold configuration. Never retried.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("report window is inverted: since {since} is after until {until}")]
    InvertedWindow {
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    },

    #[error("min_posts must be non-negative, got {0}")]
    NegativeThreshold(i64),

    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
}

/// A store failure during pagination. Aborts the whole report — rows
/// already yielded are not rolled back, but the job never delivers a
/// partial report to its sink.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("chunk fetch failed")]
    Fetch(#[from] rusqlite::Error),

    /// The cursor key failed to advance between rows. Fetching again
    /// would return the same page forever, so we abort instead.
    #[error("pagination cursor stalled at key {key}")]
    StalledCursor { key: i64 },
}

/// Everything that can end a report run, as seen by the job's caller.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("report sink failed")]
    Sink(#[source] anyhow::Error),
}
