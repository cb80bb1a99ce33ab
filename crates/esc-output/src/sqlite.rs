//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `agent_snapshots` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 pair     INTEGER NOT NULL,
                 agent    INTEGER NOT NULL,
                 tick     INTEGER NOT NULL,
                 t        REAL    NOT NULL,
                 x        REAL    NOT NULL,
                 y        REAL    NOT NULL,
                 z        REAL    NOT NULL,
                 vx       REAL    NOT NULL,
                 vy       REAL    NOT NULL,
                 vz       REAL    NOT NULL,
                 on_stair INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick           INTEGER PRIMARY KEY,
                 t              REAL    NOT NULL,
                 dt             REAL    NOT NULL,
                 finished       INTEGER NOT NULL,
                 finished_total INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (pair, agent, tick, t, x, y, z, vx, vy, vz, on_stair) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                let [x, y, z] = row.position;
                let [vx, vy, vz] = row.velocity;
                stmt.execute(rusqlite::params![
                    row.pair,
                    row.agent,
                    row.tick as i64,
                    row.t,
                    x as f64,
                    y as f64,
                    z as f64,
                    vx as f64,
                    vy as f64,
                    vz as f64,
                    row.on_stair as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, t, dt, finished, finished_total) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                row.tick as i64,
                row.t,
                row.dt as f64,
                row.finished as i64,
                row.finished_total as i64,
            ],
        )?;
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
