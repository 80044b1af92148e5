// Report job — one end-to-end report computation.
//
// The scheduler (cron, CI, whatever invokes the CLI) owns cadence and
// retry policy; the job owns a single pass: window → plan → paginate →
// accumulate → sink. Any planner or paginator error aborts the run before
// the sink sees partial data.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::info;

use super::accumulator::accumulate;
use super::error::ReportError;
use super::paginator::KeysetPaginator;
use super::planner::plan_top_users;
use super::ReportWindow;
use crate::db::models::AggregateRow;

/// Where the finished report goes. The engine makes no assumption about
/// what the sink does — persist, notify, export.
///
/// An empty report is still delivered: "nobody qualified" is a result,
/// not an error.
pub trait ReportSink {
    fn deliver(&mut self, rows: &[AggregateRow]) -> anyhow::Result<()>;
}

/// Configuration knobs for one report run. All overridable by the caller;
/// the defaults mirror the weekly report this engine was built for.
#[derive(Debug, Clone)]
pub struct ReportJob {
    /// Window length: posts from this many days before `now` count.
    pub window_days: i64,
    /// Post count a user must strictly exceed to appear.
    pub min_posts: i64,
    /// Rows per pagination chunk.
    pub chunk_size: usize,
}

impl Default for ReportJob {
    fn default() -> Self {
        Self {
            window_days: 7,
            min_posts: 10,
            chunk_size: 1000,
        }
    }
}

/// What a completed run looked like, for logging and scheduler output.
#[derive(Debug, Clone, Copy)]
pub struct ReportSummary {
    pub rows_delivered: usize,
    pub fetches: u64,
}

impl ReportJob {
    /// Run one report computation as of `now` and hand the result to the
    /// sink. `now` is injected so runs are deterministic and testable.
    pub fn run(
        &self,
        conn: &Connection,
        now: DateTime<Utc>,
        sink: &mut dyn ReportSink,
    ) -> Result<ReportSummary, ReportError> {
        let window = ReportWindow::ending_at(now, self.window_days, self.min_posts);
        info!(
            since = %window.since,
            until = %window.until,
            min_posts = window.min_posts,
            chunk_size = self.chunk_size,
            "computing top users report"
        );

        let plan = plan_top_users(&window)?;
        let mut pages = KeysetPaginator::new(conn, plan, self.chunk_size)?;
        let rows = accumulate(&mut pages, window.min_posts)?;
        let fetches = pages.fetches();

        info!(rows = rows.len(), fetches, "report computed");

        sink.deliver(&rows).map_err(ReportError::Sink)?;

        Ok(ReportSummary {
            rows_delivered: rows.len(),
            fetches,
        })
    }
}
