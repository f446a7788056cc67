//! One-call export of a finished run.

use tracing::info;

use vf_core::IngressConfig;
use vf_sim::SimOutput;

use crate::writer::OutputWriter;
use crate::{EntityRow, OutputResult, RunSummary, SnapshotRow};

/// Write records, snapshots, and the summary to `writer`, then finish it.
///
/// `config` must be the one the run used: it supplies path and checkpoint
/// names.  Returns the summary so callers can print it.
pub fn write_output<W: OutputWriter>(
    writer: &mut W,
    output: &SimOutput,
    config: &IngressConfig,
) -> OutputResult<RunSummary> {
    let records: Vec<EntityRow> = output
        .records
        .iter()
        .map(|r| EntityRow::from_record(r, config))
        .collect();
    writer.write_records(&records)?;

    let snapshots: Vec<SnapshotRow> = output
        .snapshots
        .iter()
        .flat_map(|s| SnapshotRow::from_snapshot(s, config))
        .collect();
    writer.write_snapshots(&snapshots)?;

    let summary = RunSummary::from_output(output, config);
    writer.write_summary(&summary.to_rows())?;
    writer.finish()?;

    info!(records = records.len(), snapshot_rows = snapshots.len(), "output written");
    Ok(summary)
}
