//! Agent state arrays.
//!
//! Every `Vec` field has exactly `count` elements; the `AgentId` value is the
//! index into all of them:
//!
//! ```ignore
//! let pos = store.positions[agent.index()];  // O(1), cache-friendly
//! ```
//!
//! Slots are never added or removed after construction.  A finished agent is
//! relocated in place, so an `AgentId` names the same slot for the whole run.

use esc_core::AgentId;
use glam::Vec3;

/// Structure-of-Arrays storage for one crowd's kinematic state.
#[derive(Clone, Debug)]
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Box centers.  The agent's box is always centered here.
    pub positions: Vec<Vec3>,

    /// Current velocities.
    pub velocities: Vec<Vec3>,
}

impl AgentStore {
    /// Allocate `count` agents at the origin with zero velocity.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            positions:  vec![Vec3::ZERO; count],
            velocities: vec![Vec3::ZERO; count],
        }
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    #[inline]
    pub fn position(&self, agent: AgentId) -> Vec3 {
        self.positions[agent.index()]
    }

    #[inline]
    pub fn velocity(&self, agent: AgentId) -> Vec3 {
        self.velocities[agent.index()]
    }
}
