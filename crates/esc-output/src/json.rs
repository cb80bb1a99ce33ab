//! In-memory frame recorder with JSON export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use esc_core::SimClock;
use esc_sim::{SimObserver, Simulation, Snapshot, SnapshotMeta};
use tracing::info;

use crate::OutputResult;

/// Records full [`Snapshot`]s while switched on.
///
/// Recording starts off.  Frames accumulate until [`clear`][Self::clear];
/// stopping only pauses capture.  As a [`SimObserver`] it captures one frame
/// per snapshot tick, so the frame rate follows
/// `config.output_interval_ticks`.
#[derive(Debug, Default)]
pub struct JsonRecorder {
    frames:    Vec<Snapshot>,
    recording: bool,
}

impl JsonRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.recording = true;
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Drop every recorded frame.  The recording flag is unchanged.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Capture the current state of `sim` if recording.  Returns whether a
    /// frame was stored.
    pub fn record(&mut self, sim: &Simulation) -> bool {
        if !self.recording {
            return false;
        }
        self.frames.push(sim.snapshot());
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Snapshot] {
        &self.frames
    }

    /// Write every frame to `path` as one JSON array.
    pub fn write_to(&self, path: &Path) -> OutputResult<()> {
        let mut out = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut out, &self.frames)?;
        out.flush()?;
        info!(frames = self.frames.len(), path = %path.display(), "recording written");
        Ok(())
    }
}

impl SimObserver for JsonRecorder {
    fn on_snapshot(&mut self, _clock: &SimClock, sim: &Simulation) {
        self.record(sim);
    }
}

/// Write the run-constant header to `path` as pretty-printed JSON.
pub fn write_meta(path: &Path, meta: &SnapshotMeta) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, meta)?;
    out.flush()?;
    Ok(())
}
