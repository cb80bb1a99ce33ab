//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use esc_core::SimClock;
use esc_sim::{SimObserver, Simulation};

use crate::row::{TickSummaryRow, snapshot_rows};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent snapshots and tick summaries to any
/// [`OutputWriter`] backend (CSV, SQLite, Parquet, …).
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `run_ticks` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:         W,
    finished_total: u64,
    last_error:     Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, for a simulation that has not
    /// ticked yet.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            finished_total: 0,
            last_error:     None,
        }
    }

    /// Create an observer for a simulation that may already have run: the
    /// running finish total starts from the pairs' current counters.
    pub fn for_sim(writer: W, sim: &Simulation) -> Self {
        Self {
            finished_total: sim.finished_counts().iter().sum(),
            ..Self::new(writer)
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Flush the writer outside of `run_ticks`, e.g. after driving the
    /// simulation with `update`.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, clock: &SimClock, finished: usize) {
        self.finished_total += finished as u64;
        let row = TickSummaryRow {
            tick:           clock.tick,
            t:              clock.time,
            dt:             clock.last_dt,
            finished:       finished as u64,
            finished_total: self.finished_total,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, _clock: &SimClock, sim: &Simulation) {
        let rows = snapshot_rows(sim);
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _clock: &SimClock) {
        self.finish();
    }
}
