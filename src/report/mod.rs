// Report engine — the aggregation-and-pagination core.
//
// Pipeline: planner builds the per-user aggregate query, the keyset
// paginator executes it in bounded-memory chunks, the accumulator shapes
// the final rows, and the job wires it all together and hands the result
// to a sink.

pub mod accumulator;
pub mod error;
pub mod job;
pub mod paginator;
pub mod planner;

pub use accumulator::accumulate;
pub use error::{PlanError, QueryError, ReportError};
pub use job::{ReportJob, ReportSink, ReportSummary};
pub use paginator::KeysetPaginator;
pub use planner::{plan_top_users, QueryPlan};

use chrono::{DateTime, Duration, Utc};

/// The [since, until) timestamp range that bounds which posts count toward
/// the report, plus the post count a user must strictly exceed.
#[derive(Debug, Clone, Copy)]
pub struct ReportWindow {
    /// Inclusive lower bound.
    pub since: DateTime<Utc>,
    /// Exclusive upper bound — the time of computation, supplied by the
    /// caller rather than read from a hidden wall clock.
    pub until: DateTime<Utc>,
    /// Users with exactly this many posts are excluded (strict `>`).
    pub min_posts: i64,
}

impl ReportWindow {
    /// Window covering the `days` before `until`.
    pub fn ending_at(until: DateTime<Utc>, days: i64, min_posts: i64) -> Self {
        Self {
            since: until - Duration::days(days),
            until,
            min_posts,
        }
    }

    /// Reject inverted windows and negative thresholds before any store
    /// access happens.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.since > self.until {
            return Err(PlanError::InvertedWindow {
                since: self.since,
                until: self.until,
            });
        }
        if self.min_posts < 0 {
            return Err(PlanError::NegativeThreshold(self.min_posts));
        }
        Ok(())
    }
}
