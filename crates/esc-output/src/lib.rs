//! `esc-output` — simulation output writers for the escalator flow simulator.
//!
//! Three table backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                           |
//! |-----------|-------------|---------------------------------------------------------|
//! | *(none)*  | CSV         | `agent_snapshots.csv`, `tick_summaries.csv`             |
//! | `sqlite`  | SQLite      | `output.db`                                             |
//! | `parquet` | Parquet     | `agent_snapshots.parquet`, `tick_summaries.parquet`     |
//!
//! All table backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `esc_sim::SimObserver`.
//!
//! [`JsonRecorder`] is the frame recorder: it keeps whole [`Snapshot`]s in
//! memory while recording and dumps them as one JSON array.
//!
//! [`Snapshot`]: esc_sim::Snapshot
//!
//! # Usage
//!
//! ```rust,ignore
//! use esc_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run_ticks(5_000, 0.005, &mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::{JsonRecorder, write_meta};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, TickSummaryRow, snapshot_rows};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
