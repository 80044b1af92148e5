// Tally: top active users reporting over an append-mostly posts table.
//
// This is the library root. The `report` module holds the aggregation
// and pagination engine; everything else is supporting infrastructure.

pub mod config;
pub mod db;
pub mod output;
pub mod report;
pub mod status;
