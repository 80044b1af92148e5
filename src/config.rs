use std::env;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// Everything has a default, so `tally init` and `tally report` work out
/// of the box. The .env file is loaded automatically at startup via
/// dotenvy; CLI flags override whatever is loaded here.
pub struct Config {
    /// Path to the SQLite database file (TALLY_DB_PATH, default ./tally.db).
    pub db_path: String,
    /// Report window length in days (TALLY_WINDOW_DAYS, default 7).
    pub window_days: i64,
    /// Post count a user must strictly exceed to appear in the report
    /// (TALLY_MIN_POSTS, default 10).
    pub min_posts: i64,
    /// Rows fetched per pagination chunk (TALLY_CHUNK_SIZE, default 1000).
    pub chunk_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Ok(Self {
            db_path: env::var("TALLY_DB_PATH").unwrap_or_else(|_| "./tally.db".to_string()),
            window_days: parse_env("TALLY_WINDOW_DAYS", 7)?,
            min_posts: parse_env("TALLY_MIN_POSTS", 10)?,
            chunk_size: parse_env("TALLY_CHUNK_SIZE", 1000)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} is set but not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}
