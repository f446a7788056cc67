//! The `OutputWriter` trait implemented by all backend writers.

use crate::{EntityRow, OutputResult, SnapshotRow, SummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// [`write_output`][crate::write_output] calls each `write_*` method once,
/// in declaration order, then `finish`.
pub trait OutputWriter {
    /// Write one row per entity.
    fn write_records(&mut self, rows: &[EntityRow]) -> OutputResult<()>;

    /// Write the long-format snapshot series.
    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()>;

    /// Write the run summary as metric/value pairs.
    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
