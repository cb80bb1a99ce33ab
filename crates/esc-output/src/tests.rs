//! Integration tests for esc-output.

#[cfg(test)]
fn tmp() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

#[cfg(test)]
fn small_sim(interval: u64) -> esc_sim::Simulation {
    use esc_sim::{SimBuilder, SimulationConfig};

    let config = SimulationConfig {
        escalator_pad:         0,
        stairs_num:            10,
        people_num:            3,
        output_interval_ticks: interval,
        ..SimulationConfig::default()
    };
    SimBuilder::new(config).build().unwrap()
}

#[cfg(test)]
fn snap_row(agent: u32, tick: u64) -> crate::AgentSnapshotRow {
    crate::AgentSnapshotRow {
        pair:     0,
        agent,
        tick,
        t:        tick as f64 * 0.005,
        position: [agent as f32, 1.5, -0.5],
        velocity: [0.0, 0.25, 0.0],
        on_stair: agent == 1,
    }
}

#[cfg(test)]
fn summary_row(tick: u64) -> crate::TickSummaryRow {
    crate::TickSummaryRow { tick, t: 0.5, dt: 0.005, finished: 2, finished_total: 7 }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("agent_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let expected = ["pair", "agent", "tick", "t", "x", "y", "z", "vx", "vy", "vz", "on_stair"];
        assert_eq!(headers, expected);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["tick", "t", "dt", "finished", "finished_total"]);
    }

    #[test]
    fn csv_snapshot_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "0");    // agent
        assert_eq!(&rows[0][2], "5");    // tick
        assert_eq!(&rows[2][4], "2");    // x
        assert_eq!(&rows[2][5], "1.5");  // y
        assert_eq!(&rows[1][8], "0.25"); // vy
        assert_eq!(&rows[0][10], "0");   // on_stair
        assert_eq!(&rows[1][10], "1");
    }

    #[test]
    fn csv_tick_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(3)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");     // tick
        assert_eq!(&rows[0][1], "0.5");   // t
        assert_eq!(&rows[0][2], "0.005"); // dt
        assert_eq!(&rows[0][3], "2");
        assert_eq!(&rows[0][4], "7");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }

    #[test]
    fn csv_missing_dir_errors() {
        let dir = tmp();
        let missing = dir.path().join("does").join("not").join("exist");
        assert!(CsvWriter::new(&missing).is_err());
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use esc_core::AgentId;
    use esc_sim::NoopObserver;

    use super::*;
    use crate::observer::SimOutputObserver;
    use crate::row::snapshot_rows;
    use crate::writer::OutputWriter;
    use crate::{AgentSnapshotRow, CsvWriter, OutputError, OutputResult, TickSummaryRow};

    /// Counts calls and fails every write after the first `ok_writes`.
    #[derive(Default)]
    struct FlakyWriter {
        ok_writes: usize,
        writes:    usize,
        finishes:  usize,
    }

    impl FlakyWriter {
        fn write(&mut self) -> OutputResult<()> {
            self.writes += 1;
            if self.writes > self.ok_writes {
                let msg = format!("write {} failed", self.writes);
                return Err(OutputError::Io(std::io::Error::other(msg)));
            }
            Ok(())
        }
    }

    impl OutputWriter for FlakyWriter {
        fn write_snapshots(&mut self, _rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            self.write()
        }

        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            self.write()
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finishes += 1;
            Ok(())
        }
    }

    #[test]
    fn snapshot_rows_cover_every_agent() {
        let mut sim = small_sim(0);
        sim.run_ticks(3, 0.005, &mut NoopObserver);
        sim.pairs[0].on_stair.insert(AgentId(2));

        let rows = snapshot_rows(&sim);
        assert_eq!(rows.len(), 3);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.pair, 0);
            assert_eq!(row.agent, i as u32);
            assert_eq!(row.tick, 3);
            assert_eq!(row.t, sim.time());
            assert_eq!(row.position, sim.pairs[0].crowd.positions()[i].to_array());
            assert_eq!(row.velocity, sim.pairs[0].crowd.velocities()[i].to_array());
            assert_eq!(row.on_stair, i == 2);
        }
    }

    #[test]
    fn integration_csv() {
        let mut sim = small_sim(2);
        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run_ticks(6, 0.005, &mut obs);
        assert!(obs.take_error().is_none(), "no write errors expected");

        // Interval 2 → snapshots after ticks 2, 4, 6 (3 snapshots × 3 agents).
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 9, "expected 3 snapshots × 3 agents = 9 rows, got {}", rows.len());
        let ticks: Vec<&str> = rows.iter().map(|r| r.get(2).unwrap()).collect();
        assert_eq!(ticks, ["2", "2", "2", "4", "4", "4", "6", "6", "6"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[0][0], "1");
        assert_eq!(&rows[5][0], "6");
        assert_eq!(&rows[5][2], "0.005");
        assert_eq!(&rows[5][4], "0");
    }

    #[test]
    fn late_attached_observer_counts_earlier_finishes() {
        let mut sim = small_sim(0);
        sim.run_ticks(3, 0.005, &mut NoopObserver);
        sim.pairs[0].finished = 5;

        let dir = tmp();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::for_sim(writer, &sim);
        sim.run_ticks(2, 0.005, &mut obs);
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "4");
        assert_eq!(&rows[1][4], "5");
    }

    #[test]
    fn first_error_is_kept() {
        let mut sim = small_sim(0);
        let mut obs = SimOutputObserver::new(FlakyWriter { ok_writes: 2, ..Default::default() });
        sim.run_ticks(5, 0.005, &mut obs);

        let err = obs.take_error().expect("writes 3..5 fail");
        assert_eq!(err.to_string(), "I/O error: write 3 failed");
        assert!(obs.take_error().is_none());

        let writer = obs.into_writer();
        assert_eq!(writer.writes, 5);
        assert_eq!(writer.finishes, 1);
    }

    #[test]
    fn manual_finish_without_run_ticks() {
        let mut sim = small_sim(1);
        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        for _ in 0..4 {
            sim.update(0.005, &mut obs);
        }
        obs.finish();
        assert!(obs.take_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 12);
    }
}

// ── JSON recorder ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod json_tests {
    use esc_sim::Snapshot;

    use super::*;
    use crate::json::{JsonRecorder, write_meta};

    #[test]
    fn records_only_while_on() {
        let mut sim = small_sim(0);
        let mut rec = JsonRecorder::new();
        assert!(!rec.is_recording());
        assert!(!rec.record(&sim));
        assert!(rec.is_empty());

        rec.start();
        assert!(rec.record(&sim));
        sim.run_ticks(1, 0.005, &mut esc_sim::NoopObserver);
        assert!(rec.record(&sim));
        assert_eq!(rec.len(), 2);
        assert!(rec.frames()[1].t > rec.frames()[0].t);

        rec.stop();
        assert!(!rec.record(&sim));
        assert_eq!(rec.len(), 2);
    }

    #[test]
    fn clear_keeps_recording_flag() {
        let sim = small_sim(0);
        let mut rec = JsonRecorder::new();
        rec.start();
        rec.record(&sim);
        rec.clear();
        assert!(rec.is_empty());
        assert!(rec.is_recording());
        assert!(rec.record(&sim));
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn observer_captures_on_snapshot_ticks() {
        let mut sim = small_sim(5);
        let mut rec = JsonRecorder::new();
        sim.run_ticks(5, 0.005, &mut rec);
        assert!(rec.is_empty(), "nothing recorded before start");

        rec.start();
        sim.run_ticks(20, 0.005, &mut rec);
        assert_eq!(rec.len(), 4);
        assert!(rec.frames().windows(2).all(|w| w[0].t < w[1].t));
    }

    #[test]
    fn write_to_emits_frame_array() {
        let sim = small_sim(0);
        let mut rec = JsonRecorder::new();
        rec.start();
        rec.record(&sim);
        rec.record(&sim);

        let dir = tmp();
        let path = dir.path().join("recording.json");
        rec.write_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let frames: Vec<Snapshot> = serde_json::from_str(&text).unwrap();
        assert_eq!(frames, rec.frames());

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["x"][0].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn meta_written_camel_case() {
        let sim = small_sim(0);
        let dir = tmp();
        let path = dir.path().join("meta.json");
        write_meta(&path, &sim.snapshot_meta()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["escalatorNum"], 1);
        assert_eq!(value["stairsNum"], 10);
        assert_eq!(value["peopleNum"], 3);
        assert_eq!(value["escalatorId"][0], "Esca10-(0,0)");
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshot_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 1), snap_row(1, 1), snap_row(2, 1)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM agent_snapshots", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_on_stair_as_integer() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(1, 0)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (flag, y): (i64, f64) = conn
            .query_row("SELECT on_stair, y FROM agent_snapshots WHERE agent = 1", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!(flag, 1, "on_stair=true should be stored as 1");
        assert_eq!(y, 1.5);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(7)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, finished, total): (i64, i64, i64) = conn
            .query_row(
                "SELECT tick, finished, finished_total FROM tick_summaries WHERE tick = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(tick, 7);
        assert_eq!(finished, 2);
        assert_eq!(total, 7);
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::parquet::ParquetWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn parquet_files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("agent_snapshots.parquet").exists());
        assert!(dir.path().join("tick_summaries.parquet").exists());
    }

    #[test]
    fn parquet_snapshot_rows_and_schema() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 2), snap_row(1, 2)]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("agent_snapshots.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let reader = builder.build().unwrap();

        let total_rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total_rows, 2);

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        let expected = ["pair", "agent", "tick", "t", "x", "y", "z", "vx", "vy", "vz", "on_stair"];
        assert_eq!(names, expected);
        assert_eq!(*schema.field_with_name("on_stair").unwrap().data_type(), DataType::Boolean);
        assert_eq!(*schema.field_with_name("vz").unwrap().data_type(), DataType::Float32);
    }

    #[test]
    fn parquet_finish_required() {
        // Dropping the writer without finish() leaves the footer unwritten.
        let dir = tmp();
        {
            let mut w = ParquetWriter::new(dir.path()).unwrap();
            w.write_snapshots(&[snap_row(0, 0)]).unwrap();
        }

        let file = std::fs::File::open(dir.path().join("agent_snapshots.parquet")).unwrap();
        assert!(ParquetRecordBatchReaderBuilder::try_new(file).is_err());
    }
}
