// Report accumulator — shapes the paginated rows into the final report.
//
// The threshold is already pushed into the query plan; re-checking it here
// is an idempotent guard so a plan regression can't quietly widen the
// report. Delivery order (ascending user id) is preserved as-is.

use super::error::QueryError;
use crate::db::models::AggregateRow;

/// Drain the row stream into the final ordered report.
///
/// Strict `>` semantics: a user with exactly `min_posts` posts is
/// excluded, `min_posts + 1` is included. The first stream error aborts
/// accumulation and propagates.
pub fn accumulate<I>(rows: I, min_posts: i64) -> Result<Vec<AggregateRow>, QueryError>
where
    I: IntoIterator<Item = Result<AggregateRow, QueryError>>,
{
    let mut report = Vec::new();
    for row in rows {
        let row = row?;
        if row.total_posts_count > min_posts {
            report.push(row);
        }
    }
    Ok(report)
}
