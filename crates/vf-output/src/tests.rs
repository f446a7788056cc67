//! Integration tests for vf-output.

use tempfile::TempDir;

use vf_core::{EntityId, GroupId, IngressConfig, PathId, SimTime};
use vf_sim::{run_once, CheckpointSample, EntityRecord, PathSample, Phase, SimOutput, SystemSnapshot};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Baseline scenario shrunk to a few seconds of work.
fn small_config(population: u32) -> IngressConfig {
    IngressConfig {
        population,
        horizon_secs:          4.0 * 3_600.0,
        arrival_window_secs:   Some(600.0),
        progress_log_interval: 0,
        ..IngressConfig::baseline()
    }
}

fn record(id: u32, total: Option<f64>) -> EntityRecord {
    EntityRecord {
        entity:                EntityId(id),
        group:                 GroupId(id),
        group_size:            1,
        path:                  PathId(0),
        arrival:               SimTime(10.0),
        transport_mode:        None,
        transport_delay_secs:  0.0,
        walk_secs:             0.0,
        congestion_delay_secs: 0.0,
        disturbance_secs:      0.0,
        checkpoint:            None,
        lane:                  None,
        security_wait_secs:    if total.is_some() { 4.0 } else { 0.0 },
        security_process_secs: 0.0,
        screening_failures:    1,
        outage_hold_secs:      0.0,
        descent_mode:          None,
        descent_wait_secs:     0.0,
        descent_process_secs:  0.0,
        finish:                total.map(|t| SimTime(10.0 + t)),
        completed:             total.is_some(),
        phase:                 if total.is_some() { Phase::Completed } else { Phase::Walking },
    }
}

fn snapshot(time: f64, queued: [usize; 2], escalator_queued: usize, densities: [f64; 3]) -> SystemSnapshot {
    SystemSnapshot {
        time:               SimTime(time),
        checkpoints:        queued
            .iter()
            .map(|&q| CheckpointSample { queued: q, in_use: 15, lanes: 15 })
            .collect(),
        lanes:              Vec::new(),
        escalator_queued,
        escalator_in_use:   25,
        escalator_capacity: 25,
        stairs_in_use:      2,
        stairs_density:     0.5,
        paths:              densities
            .iter()
            .map(|&d| PathSample { occupancy: 1, density: d })
            .collect(),
        completed:          0,
    }
}

// ── Summary ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod summary_tests {
    use super::*;
    use crate::RunSummary;

    #[test]
    fn means_cover_completed_entities_only() {
        let output = SimOutput {
            records:   vec![record(0, Some(100.0)), record(1, Some(300.0)), record(2, None)],
            snapshots: vec![],
        };
        let s = RunSummary::from_output(&output, &IngressConfig::baseline());
        assert_eq!(s.population, 3);
        assert_eq!(s.completed, 2);
        assert!((s.completion_rate - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.mean_total_secs, Some(200.0));
        assert_eq!(s.max_total_secs, Some(300.0));
        assert_eq!(s.mean_security_wait_secs, Some(4.0));
        assert_eq!(s.screening_failures, 3);
        assert_eq!(s.escalator_share, Some(0.0));
    }

    #[test]
    fn empty_run_has_no_means() {
        let output = SimOutput { records: vec![], snapshots: vec![] };
        let s = RunSummary::from_output(&output, &IngressConfig::baseline());
        assert_eq!(s.completion_rate, 0.0);
        assert_eq!(s.mean_total_secs, None);
        assert_eq!(s.escalator_share, None);
        assert_eq!(s.peak_escalator_queue, 0);
        assert!(s.to_rows().iter().all(|r| !r.metric.starts_with("mean_")));
    }

    #[test]
    fn peaks_come_from_snapshots() {
        let output = SimOutput {
            records:   vec![],
            snapshots: vec![
                snapshot(0.0, [3, 0], 10, [0.1, 0.2, 0.3]),
                snapshot(60.0, [1, 7], 60, [0.9, 0.1, 0.0]),
            ],
        };
        let s = RunSummary::from_output(&output, &IngressConfig::baseline());
        assert_eq!(s.peak_checkpoint_queued, vec![("north".to_owned(), 3), ("south".to_owned(), 7)]);
        assert_eq!(s.peak_escalator_queue, 60);
        assert_eq!(s.peak_path_density[0], ("E (north entrance)".to_owned(), 0.9));
        assert_eq!(s.peak_path_density[2].1, 0.3);

        let rows = s.to_rows();
        assert!(rows.iter().any(|r| r.metric == "peak_queued[south]" && r.value == 7.0));
    }

    #[test]
    fn full_run_completes_everyone() {
        let cfg = small_config(80);
        let out = run_once(cfg.clone()).unwrap();
        let s = RunSummary::from_output(&out, &cfg);
        assert_eq!(s.completed, 80);
        assert_eq!(s.completion_rate, 1.0);
        assert!(s.mean_total_secs.unwrap() > 0.0);
        assert!(s.to_string().contains("completed 80 of 80"));
    }
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;
    use crate::{EntityRow, SnapshotRow};

    #[test]
    fn names_resolved_from_config() {
        let cfg = small_config(30);
        let out = run_once(cfg.clone()).unwrap();
        for r in &out.records {
            let row = EntityRow::from_record(r, &cfg);
            assert_eq!(row.path, cfg.paths[r.path.index()].name);
            let checkpoint = row.checkpoint.unwrap();
            assert!(checkpoint == "north" || checkpoint == "south");
            assert_eq!(row.phase, "completed");
        }
    }

    #[test]
    fn snapshot_expands_per_resource() {
        let rows = SnapshotRow::from_snapshot(&snapshot(60.0, [2, 4], 5, [0.1, 0.2, 0.3]), &IngressConfig::baseline());
        let kinds: Vec<&str> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, ["checkpoint", "checkpoint", "escalator", "stairs", "path", "path", "path"]);
        assert_eq!(rows[1].resource, "south");
        assert_eq!(rows[1].queued, 4);
        assert_eq!(rows[2].queued, 5);
        assert_eq!(rows[3].density, Some(0.5));
        assert_eq!(rows[6].density, Some(0.3));
        assert!(rows.iter().all(|r| r.time_secs == 60.0));
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::CsvWriter;
    use crate::row::{ENTITY_COLUMNS, SNAPSHOT_COLUMNS};
    use crate::writer::OutputWriter;
    use crate::write_output;

    fn headers(path: std::path::PathBuf) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(dir.path().join("entity_records.csv")), ENTITY_COLUMNS);
        assert_eq!(headers(dir.path().join("system_snapshots.csv")), SNAPSHOT_COLUMNS);
        assert_eq!(headers(dir.path().join("summary.csv")), ["metric", "value"]);
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("summary.csv").exists());
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn integration_csv() {
        let cfg = small_config(60);
        let out = run_once(cfg.clone()).unwrap();

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let summary = write_output(&mut w, &out, &cfg).unwrap();
        assert_eq!(summary.completed, 60);

        let mut rdr = csv::Reader::from_path(dir.path().join("entity_records.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 60);
        assert_eq!(&rows[0][0], "0");
        assert!(rows.iter().all(|r| &r[21] == "1" && &r[22] == "completed"));

        // Two tents + escalator + stairs + three paths per snapshot.
        let mut rdr = csv::Reader::from_path(dir.path().join("system_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), out.snapshots.len() * 7);

        let mut rdr = csv::Reader::from_path(dir.path().join("summary.csv")).unwrap();
        let rate = rdr
            .records()
            .map(|r| r.unwrap())
            .find(|r| &r[0] == "completion_rate")
            .map(|r| r[1].to_owned());
        assert_eq!(rate.as_deref(), Some("1"));
    }

    #[test]
    fn incomplete_entities_leave_blank_fields() {
        let mut cfg = small_config(200);
        cfg.horizon_secs = 300.0;
        let out = run_once(cfg.clone()).unwrap();

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        write_output(&mut w, &out, &cfg).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("entity_records.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 200);
        let incomplete: Vec<_> = rows.iter().filter(|r| &r[21] == "0").collect();
        assert!(!incomplete.is_empty());
        assert!(incomplete.iter().all(|r| r[19].is_empty() && r[20].is_empty()));
        assert!(incomplete.iter().any(|r| &r[22] == "scheduled"));
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;
    use crate::{write_output, EntityRow};

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_full_run() {
        let cfg = small_config(40);
        let out = run_once(cfg.clone()).unwrap();

        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        write_output(&mut w, &out, &cfg).unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM entity_records WHERE completed = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 40);

        let snaps: i64 = conn
            .query_row("SELECT COUNT(*) FROM system_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(snaps as usize, out.snapshots.len() * 7);

        let rate: f64 = conn
            .query_row("SELECT value FROM summary WHERE metric = 'completion_rate'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rate, 1.0);
    }

    #[test]
    fn sqlite_second_run_replaces_first() {
        let cfg = small_config(30);
        let out = run_once(cfg.clone()).unwrap();

        let dir = tmp();
        for _ in 0..2 {
            let mut w = SqliteWriter::new(dir.path()).unwrap();
            write_output(&mut w, &out, &cfg).unwrap();
        }

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let records: i64 = conn
            .query_row("SELECT COUNT(*) FROM entity_records", [], |r| r.get(0))
            .unwrap();
        assert_eq!(records, 30);
        let snaps: i64 = conn
            .query_row("SELECT COUNT(*) FROM system_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(snaps as usize, out.snapshots.len() * 7);
    }

    #[test]
    fn sqlite_missing_values_are_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let row = EntityRow::from_record(&record(0, None), &IngressConfig::baseline());
        w.write_records(&[row]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (finish, phase): (Option<f64>, String) = conn
            .query_row("SELECT finish_secs, phase FROM entity_records WHERE entity_id = 0", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(finish, None);
        assert_eq!(phase, "walking");
    }
}
