//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `entity_records.csv`
//! - `system_snapshots.csv`
//! - `summary.csv`
//!
//! Missing values are written as empty fields and booleans as `0`/`1`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::{ENTITY_COLUMNS, SNAPSHOT_COLUMNS, SUMMARY_COLUMNS};
use crate::writer::OutputWriter;
use crate::{EntityRow, OutputResult, SnapshotRow, SummaryRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    records:   Writer<File>,
    snapshots: Writer<File>,
    summary:   Writer<File>,
    finished:  bool,
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvWriter {
    /// Create `dir` if needed, open the three files, and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut records = Writer::from_path(dir.join("entity_records.csv"))?;
        records.write_record(ENTITY_COLUMNS)?;

        let mut snapshots = Writer::from_path(dir.join("system_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_COLUMNS)?;

        let mut summary = Writer::from_path(dir.join("summary.csv"))?;
        summary.write_record(SUMMARY_COLUMNS)?;

        Ok(Self { records, snapshots, summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_records(&mut self, rows: &[EntityRow]) -> OutputResult<()> {
        for row in rows {
            self.records.write_record(&[
                row.entity_id.to_string(),
                row.group_id.to_string(),
                row.group_size.to_string(),
                row.path.clone(),
                row.arrival_secs.to_string(),
                opt(row.transport_mode),
                row.transport_delay_secs.to_string(),
                row.walk_secs.to_string(),
                row.congestion_delay_secs.to_string(),
                row.disturbance_secs.to_string(),
                opt(row.checkpoint.as_deref()),
                opt(row.lane),
                row.security_wait_secs.to_string(),
                row.security_process_secs.to_string(),
                row.screening_failures.to_string(),
                row.outage_hold_secs.to_string(),
                opt(row.descent_mode),
                row.descent_wait_secs.to_string(),
                row.descent_process_secs.to_string(),
                opt(row.finish_secs),
                opt(row.total_secs),
                (row.completed as u8).to_string(),
                row.phase.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.time_secs.to_string(),
                row.kind.to_owned(),
                row.resource.clone(),
                row.queued.to_string(),
                row.in_use.to_string(),
                opt(row.density),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        for row in rows {
            self.summary.write_record(&[row.metric.clone(), row.value.to_string()])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.records.flush()?;
        self.snapshots.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
