//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! three tables: `entity_records`, `system_snapshots`, and `summary`.
//! Missing values are stored as `NULL`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{EntityRow, OutputResult, SnapshotRow, SummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Create `dir` if needed, open (or create) `output.db`, and initialise
    /// the schema.  Tables left by an earlier run are dropped first.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS entity_records;
             DROP TABLE IF EXISTS system_snapshots;
             DROP TABLE IF EXISTS summary;
             CREATE TABLE entity_records (
                 entity_id             INTEGER PRIMARY KEY,
                 group_id              INTEGER NOT NULL,
                 group_size            INTEGER NOT NULL,
                 path                  TEXT    NOT NULL,
                 arrival_secs          REAL    NOT NULL,
                 transport_mode        TEXT,
                 transport_delay_secs  REAL    NOT NULL,
                 walk_secs             REAL    NOT NULL,
                 congestion_delay_secs REAL    NOT NULL,
                 disturbance_secs      REAL    NOT NULL,
                 checkpoint            TEXT,
                 lane                  INTEGER,
                 security_wait_secs    REAL    NOT NULL,
                 security_process_secs REAL    NOT NULL,
                 screening_failures    INTEGER NOT NULL,
                 outage_hold_secs      REAL    NOT NULL,
                 descent_mode          TEXT,
                 descent_wait_secs     REAL    NOT NULL,
                 descent_process_secs  REAL    NOT NULL,
                 finish_secs           REAL,
                 total_secs            REAL,
                 completed             INTEGER NOT NULL,
                 phase                 TEXT    NOT NULL
             );
             CREATE TABLE system_snapshots (
                 time_secs REAL    NOT NULL,
                 kind      TEXT    NOT NULL,
                 resource  TEXT    NOT NULL,
                 queued    INTEGER NOT NULL,
                 in_use    INTEGER NOT NULL,
                 density   REAL
             );
             CREATE TABLE summary (
                 metric TEXT PRIMARY KEY,
                 value  REAL NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_records(&mut self, rows: &[EntityRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO entity_records VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, \
                  ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.entity_id,
                    row.group_id,
                    row.group_size,
                    row.path,
                    row.arrival_secs,
                    row.transport_mode,
                    row.transport_delay_secs,
                    row.walk_secs,
                    row.congestion_delay_secs,
                    row.disturbance_secs,
                    row.checkpoint,
                    row.lane,
                    row.security_wait_secs,
                    row.security_process_secs,
                    row.screening_failures,
                    row.outage_hold_secs,
                    row.descent_mode,
                    row.descent_wait_secs,
                    row.descent_process_secs,
                    row.finish_secs,
                    row.total_secs,
                    row.completed as i64,
                    row.phase,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[SnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO system_snapshots (time_secs, kind, resource, queued, in_use, density) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.time_secs,
                    row.kind,
                    row.resource,
                    row.queued as i64,
                    row.in_use as i64,
                    row.density,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, rows: &[SummaryRow]) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for row in rows {
            tx.execute(
                "INSERT OR REPLACE INTO summary (metric, value) VALUES (?1, ?2)",
                rusqlite::params![row.metric, row.value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
