// Keyset paginator — executes a query plan in fixed-size chunks.
//
// Offset pagination costs O(offset) per page on large tables: the engine
// still walks every skipped row. Seeking on an indexed, strictly
// increasing key ("WHERE id > last seen") keeps every page at near
// constant cost instead. See
// https://blog.jooq.org/why-most-programmers-get-pagination-wrong/
//
// The paginator is a pull-based lazy iterator: the consumer drives it one
// row at a time, memory stays O(chunk_size), and cancelling is just not
// pulling again — no further fetches are issued.

use std::collections::VecDeque;

use rusqlite::{params_from_iter, Connection};
use tracing::{debug, warn};

use super::error::{PlanError, QueryError};
use super::planner::QueryPlan;
use crate::db::models::AggregateRow;

/// Iterates the plan's result set in strictly increasing cursor-key order,
/// visiting each qualifying row exactly once.
///
/// The cursor is the grouping entity's id (the user id), so the grouping
/// happens before the seek filter and chunk boundaries can never split a
/// logical group. Each fetch reads as of itself — no cross-fetch snapshot
/// is assumed.
pub struct KeysetPaginator<'a> {
    conn: &'a Connection,
    plan: QueryPlan,
    chunk_size: usize,
    last_key: i64,
    buffered: VecDeque<AggregateRow>,
    exhausted: bool,
    failed: bool,
    fetches: u64,
}

impl<'a> KeysetPaginator<'a> {
    pub fn new(conn: &'a Connection, plan: QueryPlan, chunk_size: usize) -> Result<Self, PlanError> {
        if chunk_size == 0 {
            return Err(PlanError::ZeroChunkSize);
        }
        Ok(Self {
            conn,
            plan,
            chunk_size,
            last_key: 0,
            buffered: VecDeque::new(),
            exhausted: false,
            failed: false,
            fetches: 0,
        })
    }

    /// Number of store round-trips issued so far. At most
    /// ceil(result_count / chunk_size) + 1 over a full run.
    pub fn fetches(&self) -> u64 {
        self.fetches
    }

    fn fetch_chunk(&mut self) -> Result<(), QueryError> {
        let sql = self.plan.page_sql();
        let mut stmt = self.conn.prepare(&sql)?;
        let params = self.plan.page_params(self.last_key, self.chunk_size);
        let mut rows = stmt.query(params_from_iter(params))?;

        self.fetches += 1;
        let mut fetched = 0usize;

        while let Some(row) = rows.next()? {
            let key: i64 = row.get(0)?;
            if key <= self.last_key {
                // A non-advancing cursor means the next fetch would return
                // this same page forever. Abort rather than spin.
                warn!(key, last_key = self.last_key, "pagination cursor did not advance");
                return Err(QueryError::StalledCursor { key });
            }
            self.last_key = key;
            self.buffered.push_back(AggregateRow {
                username: row.get(1)?,
                total_posts_count: row.get(2)?,
                last_post_title: row.get(3)?,
            });
            fetched += 1;
        }

        debug!(fetched, last_key = self.last_key, fetch = self.fetches, "chunk fetched");

        // A short (or empty) chunk is the end of the result set.
        if fetched < self.chunk_size {
            self.exhausted = true;
        }
        Ok(())
    }
}

impl Iterator for KeysetPaginator<'_> {
    type Item = Result<AggregateRow, QueryError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.buffered.is_empty() && !self.exhausted {
            if let Err(e) = self.fetch_chunk() {
                self.failed = true;
                return Some(Err(e));
            }
        }
        self.buffered.pop_front().map(Ok)
    }
}
