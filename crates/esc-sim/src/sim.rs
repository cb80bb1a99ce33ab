//! The `Simulation` struct and its tick loop.

use esc_core::{AgentId, PairId, SimClock};
use glam::Vec3;

use crate::pair::TickRules;
use crate::snapshot::SnapshotHeader;
use crate::{
    EscalatorPair, LaneAssignment, MinimalSnapshot, SimObserver, SimulationConfig, Snapshot,
    SnapshotMeta,
};

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Holds every escalator/crowd pair and drives the tick:
///
/// 1. **dt**: the caller's `dt` is clamped into `config.dt_bounds`, or
///    replaced by `config.fixed_dt` when set.
/// 2. **Pairs** (optionally parallel with the `parallel` feature): each pair
///    advances its belt, computes repulsion from pre-tick positions, then
///    updates its agents in ascending `AgentId` order.
/// 3. **Events** (sequential): finishing events are reported to the
///    observer in pair order, so the callback sequence does not depend on
///    how pairs were scheduled.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Simulation {
    pub config: SimulationConfig,

    /// Simulated time and tick count.
    pub clock: SimClock,

    /// Escalator/crowd pairs in grid order.
    pub pairs: Vec<EscalatorPair>,

    /// Shared lane assignment, keyed by agent index.
    pub lanes: LaneAssignment,

    pub(crate) paused: bool,
}

impl Simulation {
    // ── Control ───────────────────────────────────────────────────────────

    /// Advance by one tick unless paused.  Returns whether a tick ran.
    pub fn update<O: SimObserver>(&mut self, dt: f32, observer: &mut O) -> bool {
        if self.paused {
            return false;
        }
        self.tick(self.effective_dt(dt), observer);
        true
    }

    /// Single-step while paused.  Does nothing (and returns `false`) while
    /// running, since the regular `update` calls are already ticking.
    pub fn step<O: SimObserver>(&mut self, dt: f32, observer: &mut O) -> bool {
        if !self.paused {
            return false;
        }
        self.tick(self.effective_dt(dt), observer);
        true
    }

    /// Flip between paused and running.  Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run exactly `n` ticks regardless of the pause flag, then call
    /// `on_sim_end`.
    ///
    /// Useful for headless runs and tests.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, dt: f32, observer: &mut O) {
        let dt = self.effective_dt(dt);
        for _ in 0..n {
            self.tick(dt, observer);
        }
        observer.on_sim_end(&self.clock);
    }

    /// The `dt` a tick will actually use for a caller-supplied `dt`.
    #[inline]
    pub fn effective_dt(&self, dt: f32) -> f32 {
        self.config.fixed_dt.unwrap_or_else(|| self.config.dt_bounds.clamp(dt))
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick<O: SimObserver>(&mut self, dt: f32, observer: &mut O) {
        observer.on_tick_start(&self.clock);

        let events = self.advance_pairs(dt);

        let mut finished = 0;
        for (pair, agents) in self.pairs.iter().zip(&events) {
            let base = pair.finished - agents.len() as u64;
            for (k, &agent) in agents.iter().enumerate() {
                observer.on_agent_finished(pair.id, agent, base + k as u64 + 1);
            }
            finished += agents.len();
        }

        self.clock.advance(dt);
        observer.on_tick_end(&self.clock, finished);

        let interval = self.config.output_interval_ticks;
        if interval > 0 && self.clock.tick % interval == 0 {
            observer.on_snapshot(&self.clock, self);
        }
    }

    /// Advance every pair and collect their finishing events in pair order.
    fn advance_pairs(&mut self, dt: f32) -> Vec<Vec<AgentId>> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let rules = TickRules {
            lanes:    &self.lanes,
            forces:   &self.config.forces,
            strategy: self.config.strategy,
        };
        let pairs = &mut self.pairs;

        #[cfg(not(feature = "parallel"))]
        {
            pairs.iter_mut().map(|pair| pair.advance(dt, &rules)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            pairs.par_iter_mut().map(|pair| pair.advance(dt, &rules)).collect()
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Simulated seconds since the start of the run.
    #[inline]
    pub fn time(&self) -> f64 {
        self.clock.time
    }

    #[inline]
    pub fn pair(&self, id: PairId) -> Option<&EscalatorPair> {
        self.pairs.get(id.index())
    }

    /// Finishing counters in pair order.
    pub fn finished_counts(&self) -> Vec<u64> {
        self.pairs.iter().map(|p| p.finished).collect()
    }

    pub fn escalator_ids(&self) -> Vec<String> {
        self.pairs.iter().map(|p| p.belt.id().to_owned()).collect()
    }

    // ── Snapshots ─────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            t: self.clock.time,
            x: self.pairs.iter().map(|p| to_arrays(p.crowd.positions())).collect(),
            v: self.pairs.iter().map(|p| to_arrays(p.crowd.velocities())).collect(),
            s: self.pairs.iter().map(|p| p.on_stair.indices()).collect(),
            f: self.finished_counts(),
        }
    }

    pub fn snapshot_minimal(&self) -> MinimalSnapshot {
        MinimalSnapshot {
            t: self.clock.time,
            e: self.escalator_ids(),
            f: self.finished_counts(),
        }
    }

    pub fn snapshot_meta(&self) -> SnapshotMeta {
        SnapshotMeta {
            header:               SnapshotHeader::default(),
            escalator_id:         self.escalator_ids(),
            escalator_num:        self.pairs.len(),
            stairs_num:           self.config.stairs_num,
            people_num:           self.config.people_num,
            crowd_max_speed:      self.config.crowd_max_speed,
            escalator_position:   self.pairs.iter().map(|p| p.belt.position().to_array()).collect(),
            escalator_dy:         self.pairs.iter().map(|p| p.belt.pitch().0).collect(),
            escalator_dz:         self.pairs.iter().map(|p| p.belt.pitch().1).collect(),
            strategy:             self.config.strategy,
            go_left_prob:         self.config.go_left_prob,
            go_left_walk_prob:    self.config.go_left_walk_prob,
            go_left_indices:      self.lanes.go_left_indices(),
            go_left_walk_indices: self.lanes.go_left_walk_indices(),
        }
    }
}

fn to_arrays(vectors: &[Vec3]) -> Vec<[f32; 3]> {
    vectors.iter().map(|v| v.to_array()).collect()
}
