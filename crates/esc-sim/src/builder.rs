//! Fluent builder for constructing a [`Simulation`].

use esc_belt::{BeltConfig, EscalatorBelt, RampGeometry};
use esc_core::{PairId, SimClock, SimRng};
use esc_crowd::{Crowd, CrowdConfig};
use glam::Vec3;
use tracing::{info, warn};

use crate::{EscalatorPair, LaneAssignment, SimError, SimResult, Simulation, SimulationConfig};

/// Vertical offset of the whole escalator grid.
const GRID_Z: f32 = -0.5;

/// Fluent builder for [`Simulation`].
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                   |
/// |---------------------|-------------------------------------------|
/// | `.ramps(v)`         | `RampGeometry::synthetic` per escalator   |
/// | `.start_paused(b)`  | `false` (ticks run on every `update`)     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimulationConfig::default())
///     .ramps(loaded_ramps)
///     .build()?;
/// sim.run_ticks(1_000, 0.005, &mut NoopObserver);
/// ```
pub struct SimBuilder {
    config: SimulationConfig,
    ramps:  Option<Vec<RampGeometry>>,
    paused: bool,
}

impl SimBuilder {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config, ramps: None, paused: false }
    }

    /// Supply the housing bounds of every escalator, in grid order (must be
    /// length `config.pair_count()`).
    pub fn ramps(mut self, ramps: Vec<RampGeometry>) -> Self {
        self.ramps = Some(ramps);
        self
    }

    /// Start in the paused state: `update` is a no-op until
    /// [`Simulation::toggle_pause`], and `step` single-steps.
    pub fn start_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Validate the config, lay out the escalator grid, place every crowd,
    /// draw lane assignments, and return a ready-to-run [`Simulation`].
    ///
    /// Escalators are laid out column by column: `ix` from `-pad` to `pad`
    /// outermost, `iy` innermost.  Crowd RNG streams are derived from the
    /// root seed in that same order; lane draws come last.
    pub fn build(self) -> SimResult<Simulation> {
        let config = self.config;
        config.validate()?;

        let expected = config.pair_count();
        if let Some(ramps) = &self.ramps {
            if ramps.len() != expected {
                return Err(SimError::PairCountMismatch {
                    expected,
                    got:  ramps.len(),
                    what: "ramp geometries",
                });
            }
        }

        let mut root = SimRng::new(config.seed);
        let mut pairs = Vec::with_capacity(expected);
        let pad = config.escalator_pad as i32;

        for ix in -pad..=pad {
            for iy in -pad..=pad {
                let index = pairs.len();
                let position = grid_offset(ix, iy, config.spacing);
                let id = escalator_id(config.stairs_num, ix, iy);
                let belt_config = BeltConfig {
                    ramp: self.ramps.as_ref().map(|r| r[index].clone()),
                    ..BeltConfig::new(id, position, config.stairs_num, config.step_pad)
                };
                let belt = EscalatorBelt::new(&belt_config)?;

                let crowd_config = CrowdConfig {
                    count:     config.people_num,
                    max_speed: config.crowd_max_speed,
                    position:  Vec3::new(position.x, position.y, belt.ground_z()),
                    ..CrowdConfig::default()
                };
                let mut crowd = Crowd::new(&crowd_config, root.child(index as u64))?;
                let overlapping = crowd.initialize_positions(
                    Some(belt.ramp()),
                    config.placement_attempts,
                    Vec3::ZERO,
                )?;
                if overlapping > 0 {
                    warn!(escalator = belt.id(), overlapping, "crowd placed with overlaps");
                }

                info!(escalator = belt.id(), agents = crowd.count(), "escalator pair ready");
                pairs.push(EscalatorPair::new(PairId(index as u32), belt, crowd));
            }
        }

        let lanes = LaneAssignment::draw(
            config.people_num,
            config.go_left_prob,
            config.go_left_walk_prob,
            &mut root,
        );
        match config.strategy {
            Some(strategy) => info!(strategy = strategy.label(), "lane strategy"),
            None => info!("no lane strategy"),
        }

        Ok(Simulation {
            config,
            clock: SimClock::new(),
            pairs,
            lanes,
            paused: self.paused,
        })
    }
}

/// World position of grid cell `(ix, iy)`.
pub fn grid_offset(ix: i32, iy: i32, spacing: f32) -> Vec3 {
    Vec3::new(ix as f32 * spacing, iy as f32 * spacing - 2.0, GRID_Z)
}

/// Display id of grid cell `(ix, iy)`, e.g. `Esca30-(-1,0)`.
pub fn escalator_id(stairs: usize, ix: i32, iy: i32) -> String {
    format!("Esca{stairs}-({ix},{iy})")
}
