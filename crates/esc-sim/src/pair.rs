//! One escalator and the crowd that uses it.

use esc_belt::EscalatorBelt;
use esc_core::{AgentId, PairId};
use esc_crowd::Crowd;
use glam::Vec3;

use crate::{ForceWeights, LaneAssignment, LaneStrategy, OnStairSet};

/// Read-only inputs shared by every pair during a tick.
pub(crate) struct TickRules<'a> {
    pub lanes:    &'a LaneAssignment,
    pub forces:   &'a ForceWeights,
    pub strategy: Option<LaneStrategy>,
}

/// A belt, its crowd, which of the crowd's agents are riding, and how many
/// have reached the top so far.
///
/// Pairs share no mutable state with each other.
pub struct EscalatorPair {
    pub id:       PairId,
    pub belt:     EscalatorBelt,
    pub crowd:    Crowd,
    pub on_stair: OnStairSet,
    /// Agents that have ridden to the top since the start of the run.
    pub finished: u64,
}

impl EscalatorPair {
    pub fn new(id: PairId, belt: EscalatorBelt, crowd: Crowd) -> Self {
        let on_stair = OnStairSet::new(crowd.count());
        Self { id, belt, crowd, on_stair, finished: 0 }
    }

    /// Run one tick for this pair and return the agents that finished, in
    /// index order.
    ///
    /// ```text
    /// ① Belt      — advance and recycle steps.
    /// ② Repulsion — every agent's push, from pre-tick positions.
    /// ③ Agents    — in ascending AgentId order:
    ///                 past the top   → respawn, leave belt, count
    ///                 riding         → move with belt, re-seat on tread
    ///                 walking        → board / land / force step
    /// ```
    pub(crate) fn advance(&mut self, dt: f32, rules: &TickRules<'_>) -> Vec<AgentId> {
        self.belt.advance(dt);
        let repulsion = self.crowd.repulsion_snapshot();

        let mut finished = Vec::new();
        for i in 0..self.crowd.count() {
            let agent = AgentId(i as u32);
            let pos = self.crowd.agents.position(agent);

            if self.belt.is_finished(pos) {
                self.crowd.respawn(agent);
                self.on_stair.remove(agent);
                self.finished += 1;
                finished.push(agent);
                continue;
            }

            if self.on_stair.contains(agent) {
                self.ride(agent, dt, rules);
            } else {
                self.walk(agent, repulsion[i], dt, rules);
            }
        }
        finished
    }

    /// Carry a riding agent with the belt.  Velocity is left alone.
    fn ride(&mut self, agent: AgentId, dt: f32, rules: &TickRules<'_>) {
        let half = self.crowd.half_extents();
        let mut pos = self.crowd.agents.position(agent);

        let feet = pos - Vec3::Z * (half.z + self.belt.step_half_extents().z);
        let belt_vel = self.belt.belt_velocity(feet);

        if pos.x < self.belt.origin().x && rules.lanes.walks_left(agent) {
            pos.y += rules.forces.left_walk_speed * dt;
        }
        pos += belt_vel * dt;

        let agent_box = self.crowd.box_at(pos);
        if let Some(seat) = self.belt.surface_if_colliding(pos, &agent_box, half) {
            pos = seat;
        }
        self.crowd.agents.positions[agent.index()] = pos;
    }

    /// One step of a free walker: board if a free tread is under it, land
    /// if it sank below the ground, otherwise integrate the force model.
    fn walk(&mut self, agent: AgentId, repulsion: Vec3, dt: f32, rules: &TickRules<'_>) {
        let half = self.crowd.half_extents();
        let mut pos = self.crowd.agents.position(agent);
        let mut vel = self.crowd.agents.velocity(agent);
        let agent_box = self.crowd.box_at(pos);

        let seat = self.belt.surface_if_colliding(pos, &agent_box, half);
        if let Some(seat) = seat {
            vel = Vec3::ZERO;
            if !self.crowd.is_occupied_near(seat, agent) {
                self.on_stair.insert(agent);
                self.store(agent, seat, vel);
                return;
            }
        }

        if let Some(ground) = self.belt.ground_correction_if_below(pos, &agent_box, half) {
            if vel.z < 0.0 {
                self.on_stair.remove(agent);
                vel.z = 0.0;
                self.store(agent, ground, vel);
                return;
            }
        }

        let forces = rules.forces;
        let steering = self.belt.steering_to_stairs(pos);
        let wall = self.belt.force_from_walls(pos, &agent_box, &mut vel);
        // A walker blocked at an occupied tread waits instead of pushing on.
        let steering_gain = if seat.is_some() { 0.0 } else { forces.steering * dt };

        vel += steering * steering_gain;
        vel += repulsion * (forces.repulsion * dt);
        vel += wall * (forces.wall * dt);
        vel += vel * (-forces.damping * dt);
        vel = self.crowd.clamp_speed(vel);

        if self.belt.ready_to_enter(&agent_box) {
            let left = rules.lanes.goes_left(agent);
            match rules.strategy {
                Some(LaneStrategy::ForcePush) => {
                    vel.x += if left { -forces.force_push } else { forces.force_push };
                }
                Some(LaneStrategy::ShiftPosition) => {
                    pos.x = if left { self.belt.aisle_left() } else { self.belt.aisle_right() };
                }
                Some(LaneStrategy::DoNothing) | None => {}
            }
        }

        pos += vel * dt;
        self.store(agent, pos, vel);
    }

    #[inline]
    fn store(&mut self, agent: AgentId, pos: Vec3, vel: Vec3) {
        self.crowd.agents.positions[agent.index()] = pos;
        self.crowd.agents.velocities[agent.index()] = vel;
    }
}
