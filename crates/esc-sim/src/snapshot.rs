//! Serializable views of the simulation state.
//!
//! Field names are kept short (`t`, `x`, `v`, `s`, `f`, `e`) so recorded
//! frames stay compact; [`SnapshotMeta::header`] spells them out.

use serde::{Deserialize, Serialize};

use crate::LaneStrategy;

/// Full state: every agent's position and velocity, grouped by pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulated time.
    pub t: f64,
    /// Positions, `x[pair][agent]`.
    pub x: Vec<Vec<[f32; 3]>>,
    /// Velocities, `v[pair][agent]`.
    pub v: Vec<Vec<[f32; 3]>>,
    /// Riding agent indices per pair, ascending.
    pub s: Vec<Vec<u32>>,
    /// Finishing counters per pair.
    pub f: Vec<u64>,
}

/// Counters only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinimalSnapshot {
    pub t: f64,
    /// Escalator ids, in pair order.
    pub e: Vec<String>,
    pub f: Vec<u64>,
}

/// Human-readable meaning and units of each [`Snapshot`] field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SnapshotHeader {
    pub t: &'static str,
    pub x: &'static str,
    pub v: &'static str,
    pub s: &'static str,
    pub f: &'static str,
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self {
            t: "time [code_time]",
            x: "position [code_length]",
            v: "velocity [code_length/code_time]",
            s: "on_stair_people_indices [dimensionless]",
            f: "finishing_number_of_people [dimensionless]",
        }
    }
}

/// Run-constant description written once alongside recorded frames.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub header:               SnapshotHeader,
    pub escalator_id:         Vec<String>,
    pub escalator_num:        usize,
    pub stairs_num:           usize,
    pub people_num:           usize,
    pub crowd_max_speed:      f32,
    pub escalator_position:   Vec<[f32; 3]>,
    pub escalator_dy:         Vec<f32>,
    pub escalator_dz:         Vec<f32>,
    pub strategy:             Option<LaneStrategy>,
    pub go_left_prob:         f64,
    pub go_left_walk_prob:    f64,
    pub go_left_indices:      Vec<u32>,
    pub go_left_walk_indices: Vec<u32>,
}
