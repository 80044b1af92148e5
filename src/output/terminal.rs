// Colored terminal output for the top users report.

use colored::Colorize;

use crate::db::models::AggregateRow;
use crate::report::ReportSink;

use super::truncate_chars;

/// Renders the report as a table on stdout.
pub struct TerminalSink;

impl ReportSink for TerminalSink {
    fn deliver(&mut self, rows: &[AggregateRow]) -> anyhow::Result<()> {
        display_report(rows);
        Ok(())
    }
}

/// Display the report rows in the terminal.
pub fn display_report(rows: &[AggregateRow]) {
    if rows.is_empty() {
        println!("No users exceeded the post threshold in this window.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Top Active Users ({} users) ===", rows.len()).bold()
    );
    println!();

    // Header
    println!(
        "  {:>4}  {:<24} {:>6}  {}",
        "Rank".dimmed(),
        "Username".dimmed(),
        "Posts".dimmed(),
        "Latest post".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for (i, row) in rows.iter().enumerate() {
        let title = row
            .last_post_title
            .as_deref()
            .map(|t| truncate_chars(t, 40))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:>4}. {:<24} {:>6}  {}",
            i + 1,
            row.username,
            row.total_posts_count,
            title,
        );
    }

    println!();
}
