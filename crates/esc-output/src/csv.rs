//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

pub(crate) const SNAPSHOT_COLUMNS: [&str; 11] =
    ["pair", "agent", "tick", "t", "x", "y", "z", "vx", "vy", "vz", "on_stair"];

pub(crate) const SUMMARY_COLUMNS: [&str; 5] = ["tick", "t", "dt", "finished", "finished_total"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_COLUMNS)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_COLUMNS)?;

        Ok(Self {
            snapshots,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            let [x, y, z] = row.position;
            let [vx, vy, vz] = row.velocity;
            self.snapshots.write_record(&[
                row.pair.to_string(),
                row.agent.to_string(),
                row.tick.to_string(),
                row.t.to_string(),
                x.to_string(),
                y.to_string(),
                z.to_string(),
                vx.to_string(),
                vy.to_string(),
                vz.to_string(),
                (row.on_stair as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.t.to_string(),
            row.dt.to_string(),
            row.finished.to_string(),
            row.finished_total.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
