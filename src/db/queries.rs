// Database queries — writes and simple lookups for the users and posts tables.
//
// The report engine builds its own SQL (see the report module); everything
// else — seeding, status display, test fixtures — goes through here so the
// rest of the app gets clean Rust interfaces.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// Insert a user and return its id.
pub fn insert_user(conn: &Connection, username: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO users (username) VALUES (?1)",
        params![username],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a post and return its id. `created_at` must already be in
/// DB datetime format (see models::to_db_datetime).
pub fn insert_post(conn: &Connection, user_id: i64, title: &str, created_at: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO posts (user_id, title, created_at) VALUES (?1, ?2, ?3)",
        params![user_id, title, created_at],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Total number of users.
pub fn user_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

/// Total number of posts.
pub fn post_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
    Ok(count)
}

/// Creation time of the newest post, if any posts exist.
pub fn latest_post_at(conn: &Connection) -> Result<Option<String>> {
    let result = conn
        .query_row(
            "SELECT created_at FROM posts ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    Ok(result)
}
