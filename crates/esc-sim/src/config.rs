//! Simulation-wide configuration.
//!
//! Field names serialize in camelCase so a JSON file written for the
//! browser front-end (`escalatorPad`, `peopleNum`, `goLeftProb`, …) loads
//! unchanged.  Every field has a default; a config file only needs the
//! keys it wants to override.

use esc_core::error::{EscError, ensure_nonzero, ensure_positive, ensure_probability};
use esc_core::DtBounds;
use serde::{Deserialize, Serialize};

use crate::SimResult;

// ── LaneStrategy ──────────────────────────────────────────────────────────────

/// How agents in the boarding zone are split into the two lanes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaneStrategy {
    /// Add a fixed lateral velocity toward the agent's assigned side.
    ForcePush,
    /// Teleport the agent onto its side's aisle line.
    ShiftPosition,
    /// Leave lane choice to the wall forces.
    DoNothing,
}

impl LaneStrategy {
    pub fn label(self) -> &'static str {
        match self {
            LaneStrategy::ForcePush     => "Force Push",
            LaneStrategy::ShiftPosition => "Shift Position",
            LaneStrategy::DoNothing     => "Do Nothing",
        }
    }
}

// ── ForceWeights ──────────────────────────────────────────────────────────────

/// Per-second gains applied to each force term before it is added to a
/// free walker's velocity.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForceWeights {
    /// Pull toward the entering/exiting point.  Default: 40.
    pub steering: f32,
    /// Agent-agent repulsion.  Default: 400.
    pub repulsion: f32,
    /// Balustrade and lane forces.  Default: 1000.
    pub wall: f32,
    /// Linear velocity damping.  Default: 10.
    pub damping: f32,
    /// Extra forward speed of left-lane walkers on the belt.  Default: 1.0.
    pub left_walk_speed: f32,
    /// Lateral velocity added by [`LaneStrategy::ForcePush`].  Default: 1.0.
    pub force_push: f32,
}

impl Default for ForceWeights {
    fn default() -> Self {
        Self {
            steering:        40.0,
            repulsion:       400.0,
            wall:            1000.0,
            damping:         10.0,
            left_walk_speed: 1.0,
            force_push:      1.0,
        }
    }
}

impl ForceWeights {
    pub fn validate(&self) -> SimResult<()> {
        let terms = [
            ("steering weight", self.steering),
            ("repulsion weight", self.repulsion),
            ("wall weight", self.wall),
            ("damping weight", self.damping),
            ("left-walk speed", self.left_walk_speed),
            ("force-push speed", self.force_push),
        ];
        for (what, value) in terms {
            if !value.is_finite() || value < 0.0 {
                let msg = format!("{what} must be finite and ≥ 0, got {value}");
                return Err(EscError::Config(msg).into());
            }
        }
        Ok(())
    }
}

// ── SimulationConfig ──────────────────────────────────────────────────────────

/// Everything [`SimBuilder`][crate::SimBuilder] needs to lay out the
/// escalator grid, populate the crowds, and drive the tick loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Grid half-width: `(2·pad + 1)²` escalators.  Default: 1.
    pub escalator_pad: usize,

    /// Visible stairs per escalator.  Default: 30.
    pub stairs_num: usize,

    /// Hidden extra steps per belt.  Default: 2.
    pub step_pad: usize,

    /// Agents per crowd.  Default: 200.
    pub people_num: usize,

    /// Free-walking speed cap.  Default: 4.0.
    pub crowd_max_speed: f32,

    /// Distance between neighbouring escalators in the grid.  Default: 20.
    pub spacing: f32,

    /// Lane discipline in the boarding zone.  `None` behaves like
    /// [`LaneStrategy::DoNothing`].
    pub strategy: Option<LaneStrategy>,

    /// Probability that an agent index is assigned to the left lane.
    pub go_left_prob: f64,

    /// Probability that an agent index walks up the left lane while riding.
    pub go_left_walk_prob: f64,

    /// Seed for placement, respawn, and lane draws.  Default: 42.
    pub seed: u64,

    /// Range the caller's `dt` is clamped into.
    pub dt_bounds: DtBounds,

    /// When set, every tick uses this `dt` instead of the clamped one.
    pub fixed_dt: Option<f32>,

    /// Draws per agent during initial placement.  Default: 500.
    pub placement_attempts: usize,

    pub forces: ForceWeights,

    /// Emit `on_snapshot` every this many ticks.  `0` disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            escalator_pad:         1,
            stairs_num:            30,
            step_pad:              2,
            people_num:            200,
            crowd_max_speed:       4.0,
            spacing:               20.0,
            strategy:              None,
            go_left_prob:          0.0,
            go_left_walk_prob:     0.0,
            seed:                  42,
            dt_bounds:             DtBounds::default(),
            fixed_dt:              None,
            placement_attempts:    500,
            forces:                ForceWeights::default(),
            output_interval_ticks: 0,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> SimResult<()> {
        ensure_nonzero("stairs per escalator", self.stairs_num)?;
        ensure_nonzero("people per crowd", self.people_num)?;
        ensure_nonzero("placement attempts", self.placement_attempts)?;
        ensure_positive("crowd max speed", self.crowd_max_speed as f64)?;
        ensure_positive("escalator spacing", self.spacing as f64)?;
        ensure_probability("go-left probability", self.go_left_prob)?;
        ensure_probability("go-left-walk probability", self.go_left_walk_prob)?;
        self.dt_bounds.validate()?;
        if let Some(dt) = self.fixed_dt {
            ensure_positive("fixed dt", dt as f64)?;
        }
        self.forces.validate()
    }

    /// Number of escalators along one side of the grid.
    #[inline]
    pub fn grid_side(&self) -> usize {
        2 * self.escalator_pad + 1
    }

    /// Total number of escalator/crowd pairs.
    #[inline]
    pub fn pair_count(&self) -> usize {
        self.grid_side() * self.grid_side()
    }
}
