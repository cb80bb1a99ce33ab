//! The `Crowd` — one fixed-size group of agents paired with one escalator.

use esc_core::{Aabb, AgentId, SimRng, weight};
use glam::Vec3;
use tracing::{debug, warn};

use crate::{AgentStore, CrowdConfig, CrowdError, CrowdResult};

/// Pairs closer than this are treated as coincident and exert no push.
const COINCIDENT_EPS: f32 = 1e-3;

/// Lateral velocity jitter given to freshly placed agents (± half of this).
const SPAWN_JITTER: f32 = 0.5;

/// Vertical velocity given to freshly placed agents: they settle onto the
/// ground through the ground correction on their first ticks.
const SPAWN_FALL_SPEED: f32 = -1.0;

/// A fixed-size crowd of box-shaped agents.
///
/// Owns the agents' kinematic state and the RNG stream used for placement
/// and respawn sampling.  Agents are never removed: [`Crowd::respawn`]
/// relocates a slot in place.
pub struct Crowd {
    /// Positions and velocities, indexed by `AgentId`.
    pub agents: AgentStore,

    origin:           Vec3,
    half_extents:     Vec3,
    max_speed:        f32,
    min_separation:   f32,
    repulsion_radius: f32,
    catchment_radius: f32,
    rng:              SimRng,
}

impl Crowd {
    /// Validate `config` and allocate the crowd.  All agents start at the
    /// catchment origin with zero velocity until
    /// [`initialize_positions`][Self::initialize_positions] is called.
    pub fn new(config: &CrowdConfig, rng: SimRng) -> CrowdResult<Self> {
        config.validate()?;
        let mut agents = AgentStore::new(config.count);
        agents.positions.fill(config.position);
        Ok(Self {
            agents,
            origin:           config.position,
            half_extents:     config.half_extents(),
            max_speed:        config.max_speed,
            min_separation:   config.min_separation(),
            repulsion_radius: config.repulsion_radius(),
            catchment_radius: config.catchment_radius(),
            rng,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn count(&self) -> usize {
        self.agents.count
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    #[inline]
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    #[inline]
    pub fn min_separation(&self) -> f32 {
        self.min_separation
    }

    #[inline]
    pub fn repulsion_radius(&self) -> f32 {
        self.repulsion_radius
    }

    #[inline]
    pub fn catchment_radius(&self) -> f32 {
        self.catchment_radius
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.agents.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[Vec3] {
        &self.agents.velocities
    }

    /// The box an agent would occupy if centered at `pos`.
    #[inline]
    pub fn box_at(&self, pos: Vec3) -> Aabb {
        Aabb::from_center_half(pos, self.half_extents)
    }

    /// The box agent `agent` currently occupies.
    #[inline]
    pub fn agent_box(&self, agent: AgentId) -> Aabb {
        self.box_at(self.agents.position(agent))
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Draw a point from the catchment disk around `origin + offset`, at
    /// standing height above the ground.
    ///
    /// The radius is drawn uniformly (not area-uniform), which concentrates
    /// spawns near the center.
    pub fn sample_point(&mut self, offset: Vec3) -> Vec3 {
        let theta = self.rng.unit() * std::f32::consts::TAU;
        let radius = self.catchment_radius * self.rng.unit();
        Vec3::new(
            self.origin.x + offset.x + radius * theta.cos(),
            self.origin.y + offset.y + radius * theta.sin(),
            self.origin.z + offset.z + self.half_extents.z,
        )
    }

    /// Place every agent, in index order, by rejection sampling.
    ///
    /// Each agent gets up to `max_attempts` draws.  A draw is accepted when
    /// it lies outside `excluded` and at least the minimum separation away
    /// from every agent placed before it.  When all draws fail, the last one
    /// is kept anyway (later repulsion resolves the overlap) and a warning is
    /// logged.
    ///
    /// Velocities are reset to a small random lateral jitter plus a downward
    /// component.  Returns how many agents had to accept an invalid draw.
    pub fn initialize_positions(
        &mut self,
        excluded:     Option<&Aabb>,
        max_attempts: usize,
        offset:       Vec3,
    ) -> CrowdResult<usize> {
        if !offset.is_finite() {
            return Err(CrowdError::BadOffset(offset.to_array()));
        }
        let attempts_cap = max_attempts.max(1);
        let mut overlapping = 0;

        for i in 0..self.count() {
            let mut candidate = self.sample_point(offset);
            let mut valid = self.is_valid_spawn(candidate, i, excluded);
            let mut attempts = 1;
            while !valid && attempts < attempts_cap {
                candidate = self.sample_point(offset);
                valid = self.is_valid_spawn(candidate, i, excluded);
                attempts += 1;
            }
            if !valid {
                overlapping += 1;
                warn!(
                    agent = i,
                    attempts = attempts_cap,
                    "could not find a non-colliding spawn position; accepting overlap"
                );
            }
            self.agents.positions[i] = candidate;

            let vx = SPAWN_JITTER * (self.rng.unit() - 0.5);
            let vy = SPAWN_JITTER * (self.rng.unit() - 0.5);
            self.agents.velocities[i] = Vec3::new(vx, vy, SPAWN_FALL_SPEED);
        }
        Ok(overlapping)
    }

    /// `candidate` is outside `excluded` and far enough from agents `0..placed`.
    fn is_valid_spawn(&self, candidate: Vec3, placed: usize, excluded: Option<&Aabb>) -> bool {
        if excluded.is_some_and(|b| b.contains_point(candidate)) {
            return false;
        }
        self.agents.positions[..placed]
            .iter()
            .all(|p| candidate.distance(*p) >= self.min_separation)
    }

    /// Relocate a finished agent to a fresh sample from the catchment disk.
    ///
    /// Velocity is left untouched.  Returns the new position.
    pub fn respawn(&mut self, agent: AgentId) -> Vec3 {
        let pos = self.sample_point(Vec3::ZERO);
        self.agents.positions[agent.index()] = pos;
        debug!(agent = agent.0, x = pos.x, y = pos.y, "agent respawned");
        pos
    }

    // ── Interaction ───────────────────────────────────────────────────────

    /// Kernel-weighted push on a body at `pos` from every agent except
    /// `agent`, using current positions.  Horizontal only.
    pub fn repulsion_from(&self, agent: AgentId, pos: Vec3) -> Vec3 {
        repulsion_among(&self.agents.positions, agent.index(), pos, self.repulsion_radius)
    }

    /// Repulsion on every agent at its own position, all evaluated against
    /// the same (pre-tick) positions.
    ///
    /// Call this before any agent is moved in a tick: the result does not
    /// depend on the order in which agents are later updated.
    pub fn repulsion_snapshot(&self) -> Vec<Vec3> {
        let positions = &self.agents.positions;
        positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| repulsion_among(positions, i, pos, self.repulsion_radius))
            .collect()
    }

    /// `true` if any agent other than `excluding` stands within half the
    /// minimum separation of `candidate`.
    ///
    /// Reads live positions, so an agent that claimed a belt entry point
    /// earlier in the same tick blocks later claimants.
    pub fn is_occupied_near(&self, candidate: Vec3, excluding: AgentId) -> bool {
        let limit = self.min_separation * 0.5;
        self.agents
            .positions
            .iter()
            .enumerate()
            .any(|(j, p)| j != excluding.index() && candidate.distance(*p) < limit)
    }

    /// Scale `vel` down to the crowd's speed cap if it exceeds it.
    #[inline]
    pub fn clamp_speed(&self, vel: Vec3) -> Vec3 {
        vel.clamp_length_max(self.max_speed)
    }
}

/// Sum of `normalize(pos − p_j) · weight(|pos − p_j|, h)` over every
/// `p_j` except index `skip`, with the vertical component zeroed.
fn repulsion_among(positions: &[Vec3], skip: usize, pos: Vec3, h: f32) -> Vec3 {
    let mut force = Vec3::ZERO;
    for (j, &other) in positions.iter().enumerate() {
        if j == skip {
            continue;
        }
        let dr = pos - other;
        let r = dr.length();
        if r > COINCIDENT_EPS && r < h {
            force += dr / r * weight(r, h);
        }
    }
    force.z = 0.0;
    force
}
