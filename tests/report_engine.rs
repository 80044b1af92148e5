// Report engine tests — aggregation and pagination properties, exercised
// against an in-memory SQLite database with real fixture rows.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;

use tally::db::models::{to_db_datetime, AggregateRow};
use tally::db::{queries, schema};
use tally::report::{accumulate, plan_top_users, KeysetPaginator, ReportWindow};

fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    schema::create_tables(&conn).unwrap();
    conn
}

/// Fixed "now" so every window in these tests is deterministic.
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn add_user(conn: &Connection, username: &str) -> i64 {
    queries::insert_user(conn, username).unwrap()
}

/// Insert `n` posts for a user, all with the same timestamp, and return
/// the title of the last (highest-id) one.
fn add_posts(conn: &Connection, user_id: i64, n: u32, at: DateTime<Utc>) -> String {
    let created_at = to_db_datetime(at);
    let mut last_title = String::new();
    for k in 1..=n {
        last_title = format!("user{user_id} post {k}");
        queries::insert_post(conn, user_id, &last_title, &created_at).unwrap();
    }
    last_title
}

fn run_report(conn: &Connection, window: ReportWindow, chunk_size: usize) -> Vec<AggregateRow> {
    let plan = plan_top_users(&window).unwrap();
    let mut pages = KeysetPaginator::new(conn, plan, chunk_size).unwrap();
    accumulate(&mut pages, window.min_posts).unwrap()
}

// --- P1: completeness ---

#[test]
fn exactly_the_over_threshold_users_are_returned() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);
    let in_window = now() - Duration::days(3);
    let out_of_window = now() - Duration::days(10);

    let alice = add_user(&conn, "alice");
    add_posts(&conn, alice, 12, in_window);

    let bob = add_user(&conn, "bob");
    add_posts(&conn, bob, 5, in_window);

    // 11 in window, 4 outside — qualifies on the windowed count alone
    let carol = add_user(&conn, "carol");
    add_posts(&conn, carol, 11, in_window);
    add_posts(&conn, carol, 4, out_of_window);

    // 15 posts but only 6 in window — must not qualify
    let dave = add_user(&conn, "dave");
    add_posts(&conn, dave, 6, in_window);
    add_posts(&conn, dave, 9, out_of_window);

    add_user(&conn, "erin"); // no posts at all

    let rows = run_report(&conn, window, 1000);
    let names: Vec<_> = rows.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, ["alice", "carol"]);
}

// --- P2: aggregate correctness ---

#[test]
fn counts_cover_only_the_window() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);

    let alice = add_user(&conn, "alice");
    add_posts(&conn, alice, 14, now() - Duration::days(2));
    add_posts(&conn, alice, 6, now() - Duration::days(30));

    let rows = run_report(&conn, window, 1000);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_posts_count, 14);
}

#[test]
fn since_bound_is_inclusive_and_until_is_exclusive() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 0);

    let edge = add_user(&conn, "edge");
    // Exactly on the lower bound: counted.
    add_posts(&conn, edge, 2, window.since);
    // Exactly on the upper bound: not counted.
    add_posts(&conn, edge, 3, window.until);

    let rows = run_report(&conn, window, 1000);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_posts_count, 2);
}

// --- P3: recency correctness (windowed interpretation) ---

#[test]
fn last_post_title_is_the_highest_id_post_in_the_window() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);

    let alice = add_user(&conn, "alice");
    // Identical timestamps: the id order breaks the tie.
    let last = add_posts(&conn, alice, 12, now() - Duration::days(1));

    let rows = run_report(&conn, window, 1000);
    assert_eq!(rows[0].last_post_title.as_deref(), Some(last.as_str()));
}

#[test]
fn last_post_title_ignores_posts_outside_the_window() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);

    let alice = add_user(&conn, "alice");
    let last_in_window = add_posts(&conn, alice, 12, now() - Duration::days(1));
    // Higher id, but created after the window closes. The reported title
    // must stay consistent with the windowed count.
    add_posts(&conn, alice, 1, now() + Duration::hours(2));

    let rows = run_report(&conn, window, 1000);
    assert_eq!(rows[0].total_posts_count, 12);
    assert_eq!(
        rows[0].last_post_title.as_deref(),
        Some(last_in_window.as_str())
    );
}

// --- P4: pagination equivalence ---

#[test]
fn chunk_size_does_not_change_the_result() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);
    let at = now() - Duration::days(2);

    for (name, posts) in [("alice", 12), ("bob", 25), ("carol", 8), ("dave", 11), ("erin", 40)] {
        let id = add_user(&conn, name);
        add_posts(&conn, id, posts, at);
    }

    let one_by_one = run_report(&conn, window, 1);
    let all_at_once = run_report(&conn, window, 1000);
    assert_eq!(one_by_one, all_at_once);
    assert_eq!(one_by_one.len(), 4);
}

// --- P5: monotonic cursor ---

#[test]
fn fetch_count_and_delivery_order_match_keyset_paging() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);
    let at = now() - Duration::days(2);

    for name in ["alice", "bob", "carol", "dave"] {
        let id = add_user(&conn, name);
        add_posts(&conn, id, 15, at);
    }

    let plan = plan_top_users(&window).unwrap();
    let mut pages = KeysetPaginator::new(&conn, plan, 2).unwrap();
    let rows = accumulate(&mut pages, window.min_posts).unwrap();

    // Delivered in ascending user id order (insertion order here).
    let names: Vec<_> = rows.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob", "carol", "dave"]);

    // 4 qualifying rows at chunk size 2: two full chunks plus the empty
    // fetch that confirms the end of data.
    assert_eq!(pages.fetches(), 3);
}

#[test]
fn empty_result_takes_a_single_fetch() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);

    let plan = plan_top_users(&window).unwrap();
    let mut pages = KeysetPaginator::new(&conn, plan, 1000).unwrap();
    let rows = accumulate(&mut pages, window.min_posts).unwrap();

    assert!(rows.is_empty());
    assert_eq!(pages.fetches(), 1);
}

// --- P6: strict threshold ---

#[test]
fn threshold_is_exclusive() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);
    let at = now() - Duration::days(2);

    let at_threshold = add_user(&conn, "at_threshold");
    add_posts(&conn, at_threshold, 10, at);

    let just_over = add_user(&conn, "just_over");
    add_posts(&conn, just_over, 11, at);

    let rows = run_report(&conn, window, 1000);
    let names: Vec<_> = rows.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, ["just_over"]);
}

// --- Cancellation: the consumer stopping means no further fetches ---

#[test]
fn dropping_the_iterator_early_stops_fetching() {
    let conn = test_db();
    let window = ReportWindow::ending_at(now(), 7, 10);
    let at = now() - Duration::days(2);

    for name in ["alice", "bob", "carol", "dave", "erin", "frank"] {
        let id = add_user(&conn, name);
        add_posts(&conn, id, 15, at);
    }

    let plan = plan_top_users(&window).unwrap();
    let mut pages = KeysetPaginator::new(&conn, plan, 2).unwrap();

    // Pull a single row — one chunk fetched, then stop.
    let first = pages.next().unwrap().unwrap();
    assert_eq!(first.username, "alice");
    assert_eq!(pages.fetches(), 1);
}
