// Data models — Rust structs that map to database rows.
//
// These are the types that flow through the application. They're separate
// from the database queries so other modules can use them without depending
// on rusqlite directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Datetime format used in the database — matches SQLite's datetime('now')
/// output, so stored values compare correctly as text.
pub const DB_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a timestamp the way it's stored in the posts table.
pub fn to_db_datetime(t: DateTime<Utc>) -> String {
    t.format(DB_DATETIME_FORMAT).to_string()
}

/// One summarized record per qualifying user: how many posts they made
/// in the report window, and the title of their most recent post in it.
///
/// Derived and ephemeral — never persisted by the report engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub username: String,
    pub total_posts_count: i64,
    /// None only for users with no posts in the window; such users never
    /// pass the threshold filter, but the type keeps the absence honest.
    pub last_post_title: Option<String>,
}
