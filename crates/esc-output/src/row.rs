//! Plain data row types written by output backends.

use esc_sim::Simulation;

/// One agent's kinematic state at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub pair:     u32,
    pub agent:    u32,
    pub tick:     u64,
    pub t:        f64,
    pub position: [f32; 3],
    pub velocity: [f32; 3],
    pub on_stair: bool,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    pub t:              f64,
    pub dt:             f32,
    /// Agents that reached the top during this tick, across all pairs.
    pub finished:       u64,
    /// Running finish total kept by the observer: every pair's counter at
    /// attach time plus everything finished since.
    pub finished_total: u64,
}

/// Flatten the current state of `sim` into rows, pair-major then agent
/// order.
pub fn snapshot_rows(sim: &Simulation) -> Vec<AgentSnapshotRow> {
    let total: usize = sim.pairs.iter().map(|p| p.crowd.count()).sum();
    let mut rows = Vec::with_capacity(total);

    for pair in &sim.pairs {
        let store = &pair.crowd.agents;
        for agent in store.agent_ids() {
            let (p, v) = (store.position(agent), store.velocity(agent));
            rows.push(AgentSnapshotRow {
                pair:     pair.id.0,
                agent:    agent.0,
                tick:     sim.clock.tick,
                t:        sim.clock.time,
                position: p.to_array(),
                velocity: v.to_array(),
                on_stair: pair.on_stair.contains(agent),
            });
        }
    }
    rows
}
