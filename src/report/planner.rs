// Aggregation query planner — builds the per-user aggregate query.
//
// The threshold filter deliberately never references a computed alias in
// the clause that defines it. Per the SQL spec, WHERE and HAVING have
// higher precedence than aliases, so "HAVING posts_count > n" silently
// breaks on engines that follow the spec (Postgres does; MySQL happens
// not to). Instead the query has two stages: an inner stage that computes
// and names the aggregate, and an outer stage that filters by name across
// the subquery boundary. That evaluation order is engine-independent.

use rusqlite::types::Value;

use super::error::PlanError;
use super::ReportWindow;
use crate::db::models::to_db_datetime;

/// An executable description of the aggregate query: SQL text plus its
/// bound parameters, before any pagination clause is attached.
///
/// The outer SELECT exposes the grouping entity's id as `agg.id` — the
/// paginator seeks on that column.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub(crate) sql: String,
    pub(crate) params: Vec<Value>,
}

impl QueryPlan {
    /// The plan augmented with the keyset clause: seek past the last seen
    /// key, in cursor order, one chunk at a time.
    pub(crate) fn page_sql(&self) -> String {
        // Placeholder numbering continues where the plan's own params end.
        let n = self.params.len();
        format!(
            "{} AND agg.id > ?{} ORDER BY agg.id ASC LIMIT ?{}",
            self.sql,
            n + 1,
            n + 2
        )
    }

    pub(crate) fn page_params(&self, last_key: i64, chunk_size: usize) -> Vec<Value> {
        let mut params = self.params.clone();
        params.push(Value::Integer(last_key));
        params.push(Value::Integer(chunk_size as i64));
        params
    }
}

/// Build the top-users aggregate: for each user, the count of their posts
/// in the window and the title of their most recent post in the window,
/// keeping only users whose count strictly exceeds the threshold.
///
/// The count and the latest-title subquery share the identical window
/// predicate — computing them over different windows would make the report
/// internally inconsistent.
pub fn plan_top_users(window: &ReportWindow) -> Result<QueryPlan, PlanError> {
    window.validate()?;

    let sql = "\
        SELECT agg.id, agg.username, agg.total_posts_count, agg.last_post_title \
          FROM ( \
            SELECT u.id AS id, \
                   u.username AS username, \
                   COUNT(p.id) AS total_posts_count, \
                   (SELECT q.title \
                      FROM posts q \
                     WHERE q.user_id = u.id \
                       AND q.created_at >= ?1 AND q.created_at < ?2 \
                     ORDER BY q.id DESC \
                     LIMIT 1) AS last_post_title \
              FROM users u \
              LEFT JOIN posts p \
                ON p.user_id = u.id \
               AND p.created_at >= ?1 AND p.created_at < ?2 \
             GROUP BY u.id, u.username \
          ) AS agg \
         WHERE agg.total_posts_count > ?3"
        .to_string();

    let params = vec![
        Value::Text(to_db_datetime(window.since)),
        Value::Text(to_db_datetime(window.until)),
        Value::Integer(window.min_posts),
    ];

    Ok(QueryPlan { sql, params })
}
