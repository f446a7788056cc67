//! `vf-output` — run summaries and output writers for the venue-funnel
//! simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                   |
//! |-----------|---------|-----------------------------------------------------------------|
//! | *(none)*  | CSV     | `entity_records.csv`, `system_snapshots.csv`, `summary.csv`     |
//! | `sqlite`  | SQLite  | `output.db` (tables of the same names)                          |
//!
//! Both implement [`OutputWriter`].  This crate only reads the finished
//! [`SimOutput`][vf_sim::SimOutput]; it never touches a running simulation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use vf_output::{write_output, CsvWriter};
//!
//! let output = vf_sim::run_once(config.clone())?;
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! let summary = write_output(&mut writer, &output, &config)?;
//! println!("{summary}");
//! ```

pub mod csv;
pub mod error;
pub mod report;
pub mod row;
pub mod summary;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use report::write_output;
pub use row::{EntityRow, SnapshotRow, SummaryRow};
pub use summary::RunSummary;
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
