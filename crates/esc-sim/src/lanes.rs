//! Per-agent lane assignment.

use esc_core::{AgentId, SimRng};
use rustc_hash::FxHashSet;

/// Which agent indices keep left, and which walk up the left lane while
/// riding.
///
/// Drawn once at build time and shared by every crowd: agent `i` of each
/// crowd gets the same assignment.  The two draws are independent, so an
/// index can be in both sets, either, or neither.
#[derive(Clone, Debug, Default)]
pub struct LaneAssignment {
    go_left:      FxHashSet<AgentId>,
    go_left_walk: FxHashSet<AgentId>,
}

impl LaneAssignment {
    /// Two Bernoulli draws per index in `0..count`, interleaved in index
    /// order: first the go-left draw, then the walk draw.
    pub fn draw(count: usize, go_left_prob: f64, go_left_walk_prob: f64, rng: &mut SimRng) -> Self {
        let mut lanes = Self::default();
        for i in 0..count as u32 {
            if rng.gen_bool(go_left_prob) {
                lanes.go_left.insert(AgentId(i));
            }
            if rng.gen_bool(go_left_walk_prob) {
                lanes.go_left_walk.insert(AgentId(i));
            }
        }
        lanes
    }

    #[inline]
    pub fn goes_left(&self, agent: AgentId) -> bool {
        self.go_left.contains(&agent)
    }

    #[inline]
    pub fn walks_left(&self, agent: AgentId) -> bool {
        self.go_left_walk.contains(&agent)
    }

    /// Sorted indices of go-left agents.
    pub fn go_left_indices(&self) -> Vec<u32> {
        sorted(&self.go_left)
    }

    /// Sorted indices of left-lane walkers.
    pub fn go_left_walk_indices(&self) -> Vec<u32> {
        sorted(&self.go_left_walk)
    }
}

fn sorted(set: &FxHashSet<AgentId>) -> Vec<u32> {
    let mut v: Vec<u32> = set.iter().map(|a| a.0).collect();
    v.sort_unstable();
    v
}
