// System status display — shows DB stats and the newest post time.

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::db::queries;

/// Display system status to the terminal.
pub fn show(conn: &Connection, db_display_path: &str) -> Result<()> {
    // Database file size
    let file_size = std::fs::metadata(db_display_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_display_path, file_size);

    let users = queries::user_count(conn)?;
    let posts = queries::post_count(conn)?;
    println!("Users: {users}");
    println!("Posts: {posts}");

    match queries::latest_post_at(conn)? {
        Some(at) => println!("Newest post: {at}"),
        None => {
            println!("Newest post: none yet");
            println!("  Run `tally seed` to generate demo data");
        }
    }

    Ok(())
}

/// Print a hint when the database file doesn't exist yet.
pub fn missing(db_display_path: &str) -> bool {
    if Path::new(db_display_path).exists() {
        return false;
    }
    println!("Database: not initialized");
    println!("\nRun `tally init` to set up the database.");
    true
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
