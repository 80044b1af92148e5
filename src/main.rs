use anyhow::Result;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use tally::config::Config;
use tally::db::models::to_db_datetime;
use tally::db::queries;
use tally::output::json::JsonSink;
use tally::output::terminal::TerminalSink;
use tally::report::ReportJob;

/// Tally: top active users reporting.
///
/// Walks a potentially huge posts table in bounded memory and reports the
/// users whose post count in the window exceeds a threshold, along with
/// the title of their most recent post.
#[derive(Parser)]
#[command(name = "tally", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database and schema
    Init,

    /// Generate deterministic demo users and posts
    Seed {
        /// Number of users to create (default: 50)
        #[arg(long, default_value = "50")]
        users: u32,

        /// Spread posts over this many days (default: 14)
        #[arg(long, default_value = "14")]
        days: u32,
    },

    /// Compute the top active users report
    Report {
        /// Users must have strictly more than this many posts in the window
        #[arg(long)]
        min_posts: Option<i64>,

        /// Window length in days before now
        #[arg(long)]
        window_days: Option<i64>,

        /// Rows fetched per pagination chunk
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Emit the report as JSON on stdout instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show system status (DB stats, newest post)
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tally=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing tally database...");
            let conn = tally::db::initialize(&config.db_path)?;
            let users = queries::user_count(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Users so far: {users}");
            println!("\nNext: `tally seed` for demo data, then `tally report`.");
        }

        Commands::Seed { users, days } => {
            let conn = tally::db::initialize(&config.db_path)?;
            let (user_count, post_count) = seed(&conn, users, days)?;
            println!("Seeded {user_count} users with {post_count} posts over the past {days} days.");
            println!("Run `tally report` to see who's been active.");
        }

        Commands::Report {
            min_posts,
            window_days,
            chunk_size,
            json,
        } => {
            let conn = tally::db::open(&config.db_path)?;

            let job = ReportJob {
                window_days: window_days.unwrap_or(config.window_days),
                min_posts: min_posts.unwrap_or(config.min_posts),
                chunk_size: chunk_size.unwrap_or(config.chunk_size),
            };

            let summary = if json {
                let mut sink = JsonSink::new(std::io::stdout().lock());
                job.run(&conn, Utc::now(), &mut sink)?
            } else {
                let mut sink = TerminalSink;
                job.run(&conn, Utc::now(), &mut sink)?
            };

            if !json {
                println!(
                    "{}",
                    format!(
                        "{} users over the threshold ({} chunk fetches)",
                        summary.rows_delivered, summary.fetches
                    )
                    .dimmed()
                );
            }
        }

        Commands::Status => {
            if !tally::status::missing(&config.db_path) {
                let conn = tally::db::open(&config.db_path)?;
                tally::status::show(&conn, &config.db_path)?;
            }
        }
    }

    Ok(())
}

/// Insert deterministic demo data: each user gets a different post count,
/// spread over the past `days` days plus an equal tail outside the window,
/// so the default report has both qualifying and excluded users.
fn seed(conn: &rusqlite::Connection, users: u32, days: u32) -> Result<(u32, u64)> {
    let now = Utc::now();
    let spread_hours = i64::from(days) * 2 * 24;
    let mut posts_inserted: u64 = 0;

    for i in 0..users {
        let username = format!("user{:03}", i + 1);
        let user_id = queries::insert_user(conn, &username)?;

        // Varies from 0 to 39 posts per user, deterministically.
        let post_total = (i * 7 + 3) % 40;
        for j in 0..post_total {
            let age_hours = i64::from((i * 13 + j * 11) % (spread_hours as u32).max(1));
            let created_at = to_db_datetime(now - Duration::hours(age_hours));
            let title = format!("{username}'s post #{}", j + 1);
            queries::insert_post(conn, user_id, &title, &created_at)?;
            posts_inserted += 1;
        }
    }

    Ok((users, posts_inserted))
}
