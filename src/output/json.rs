// JSON sink — writes the report as a JSON array to any writer.
//
// Useful for piping `tally report --json` into other tooling.

use std::io::Write;

use crate::db::models::AggregateRow;
use crate::report::ReportSink;

pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn deliver(&mut self, rows: &[AggregateRow]) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, rows)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
