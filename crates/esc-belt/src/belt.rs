//! `EscalatorBelt` — step transport plus every geometric query agents make
//! against one escalator.

use esc_core::{Aabb, StepId, weight};
use glam::Vec3;
use tracing::debug;

use crate::config::{GROUND_OFFSET, ORIGIN_OFFSET, STEP_WIDTH_FRACTION};
use crate::{BeltConfig, BeltResult, STEP_DY, STEP_DZ, Step};

/// Below this distance from the top, vertical step speed eases off.
const TOP_BUFFER: f32 = 0.3;

/// Floor on the easing factor so steps never stall.
const MIN_EASE: f32 = 0.05;

/// A step recycles once it passes the top corner by this fraction of a pitch.
const RECYCLE_TOLERANCE: f32 = 0.1;

/// Float slack when deciding whether a freshly laid step is past the top.
const LAYOUT_EPS: f32 = 1e-4;

/// The entering point sits this many pitches ahead of the first step.
const ENTRY_PITCHES: f32 = 3.0;

/// Depth an agent is seated into a tread when snapped, so the contact
/// persists on the next query.
const SURFACE_EPS: f32 = 1e-3;

/// Support radius of the balustrade push on agents beside the belt.
const WALL_RADIUS: f32 = 0.5;

/// Strength of the push toward a handrail in the boarding zone.
const LANE_GAIN: f32 = 1.0;

/// Strength of the centering nudge on riders with almost no tread clearance.
const CENTERING_GAIN: f32 = 0.1;

/// Clearance guard: riders whose `clearance * 0.9` is under one rise get
/// centered.
const CLEARANCE_GUARD: f32 = 0.9;

/// One escalator: a closed loop of steps plus its fixed reference geometry.
///
/// Coordinates are Z-up with the belt travelling toward `+Y`; `X` is the
/// lateral axis, `x0` the belt's center line.
pub struct EscalatorBelt {
    id:              String,
    position:        Vec3,
    count:           usize,
    pad:             usize,
    x0:              f32,
    y0:              f32,
    z0:              f32,
    ymax:            f32,
    zmax:            f32,
    ground_z:        f32,
    step_half:       Vec3,
    handrail_margin: f32,
    ramp:            Aabb,
    entering_point:  Vec3,
    exiting_point:   Vec3,
    aisle_left:      f32,
    aisle_right:     f32,
    steps:           Vec<Step>,
}

impl EscalatorBelt {
    /// Validate `config`, derive the reference geometry, and lay out
    /// `count + pad` steps one pitch apart starting one pitch below the
    /// origin.  Steps that land beyond the top corner are wrapped to the
    /// bottom straight away.
    pub fn new(config: &BeltConfig) -> BeltResult<Self> {
        config.validate()?;
        let ramp = config.ramp().bounds;
        let origin = config.position + ORIGIN_OFFSET;
        let (x0, y0, z0) = (origin.x, origin.y, origin.z);
        let count = config.count as f32;

        let width = ramp.size().x * STEP_WIDTH_FRACTION;
        let step_half = Vec3::new(width * 0.5, STEP_DY * 0.5, STEP_DZ * 0.5);
        let ground_z = config.position.z + GROUND_OFFSET;

        let total = config.count + config.pad;
        let steps = (0..total)
            .map(|i| Step {
                id:           StepId(i as u32),
                position:     Vec3::new(
                    x0,
                    i as f32 * STEP_DY + y0 - STEP_DY,
                    i as f32 * STEP_DZ + z0 - STEP_DZ,
                ),
                half_extents: step_half,
            })
            .collect();

        let mut belt = Self {
            id: config.id.clone(),
            position: config.position,
            count: config.count,
            pad: config.pad,
            x0,
            y0,
            z0,
            ymax: count * STEP_DY + y0,
            zmax: count * STEP_DZ + z0,
            ground_z,
            step_half,
            handrail_margin: config.handrail_margin,
            ramp,
            entering_point: Vec3::new(x0, y0 - ENTRY_PITCHES * STEP_DY, ground_z),
            exiting_point: Vec3::new(x0, y0 + STEP_DY, z0 + STEP_DZ * 1.5),
            aisle_left: x0 - width * 0.25,
            aisle_right: x0 + width * 0.25,
            steps,
        };

        let mut wrapped = 0;
        for i in (0..belt.steps.len()).rev() {
            let p = belt.steps[i].position;
            if p.y > belt.ymax + LAYOUT_EPS || p.z > belt.zmax + LAYOUT_EPS {
                belt.recycle(i);
                wrapped += 1;
            }
        }
        debug!(belt = %belt.id, steps = total, wrapped, "escalator belt laid out");
        Ok(belt)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Visible stair count.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn pad(&self) -> usize {
        self.pad
    }

    /// Reference point of the first stair.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.x0, self.y0, self.z0)
    }

    #[inline]
    pub fn ymax(&self) -> f32 {
        self.ymax
    }

    #[inline]
    pub fn zmax(&self) -> f32 {
        self.zmax
    }

    #[inline]
    pub fn ground_z(&self) -> f32 {
        self.ground_z
    }

    #[inline]
    pub fn pitch(&self) -> (f32, f32) {
        (STEP_DY, STEP_DZ)
    }

    #[inline]
    pub fn step_half_extents(&self) -> Vec3 {
        self.step_half
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    #[inline]
    pub fn ramp(&self) -> &Aabb {
        &self.ramp
    }

    /// Where walkers head before boarding: on the ground, three pitches
    /// ahead of the first stair.
    #[inline]
    pub fn entering_point(&self) -> Vec3 {
        self.entering_point
    }

    /// Tread surface one pitch past the first stair.  Walkers in the belt
    /// footprint steer here.
    #[inline]
    pub fn exiting_point(&self) -> Vec3 {
        self.exiting_point
    }

    /// Lateral center of the left lane.
    #[inline]
    pub fn aisle_left(&self) -> f32 {
        self.aisle_left
    }

    /// Lateral center of the right lane.
    #[inline]
    pub fn aisle_right(&self) -> f32 {
        self.aisle_right
    }

    // ── Transport ─────────────────────────────────────────────────────────

    /// Belt velocity at `pos`: one pitch per second, with the vertical part
    /// eased down within [`TOP_BUFFER`] of the top.
    pub fn belt_velocity(&self, pos: Vec3) -> Vec3 {
        let to_top = (self.zmax - pos.z).abs();
        let factor = if to_top < TOP_BUFFER {
            (to_top / TOP_BUFFER).max(MIN_EASE)
        } else {
            1.0
        };
        Vec3::new(0.0, STEP_DY, STEP_DZ * factor)
    }

    /// Move every step by its belt velocity, then recycle the ones that ran
    /// past the top corner.
    ///
    /// Recycling runs after all steps have moved, in descending index
    /// order, so each recycled step is placed relative to the final
    /// position of its successor.
    pub fn advance(&mut self, dt: f32) {
        for i in 0..self.steps.len() {
            let v = self.belt_velocity(self.steps[i].position);
            self.steps[i].position += v * dt;
        }
        for i in (0..self.steps.len()).rev() {
            if self.is_past_top(self.steps[i].position) {
                self.recycle(i);
            }
        }
    }

    fn is_past_top(&self, p: Vec3) -> bool {
        p.y > self.ymax + RECYCLE_TOLERANCE * STEP_DY
            || p.z > self.zmax + RECYCLE_TOLERANCE * STEP_DZ
    }

    /// Put step `i` one pitch below the step that follows it in wrap order.
    fn recycle(&mut self, i: usize) {
        let next = (i + 1) % self.steps.len();
        self.steps[i].position = self.steps[next].position - Vec3::new(0.0, STEP_DY, STEP_DZ);
    }

    // ── Collision ─────────────────────────────────────────────────────────

    /// Box of a step centered at `step_pos`.
    #[inline]
    pub fn stair_box(&self, step_pos: Vec3) -> Aabb {
        Aabb::from_center_half(step_pos, self.step_half)
    }

    /// The position an agent should be snapped to if its box touches any
    /// step, checking steps in index order and using the first hit.
    ///
    /// Lateral position is held inside the tread minus the handrail margin;
    /// height is the tread top plus the agent's half-height, less a hair so
    /// the agent keeps touching the step it was snapped to.
    pub fn surface_if_colliding(
        &self,
        pos:        Vec3,
        agent_box:  &Aabb,
        agent_half: Vec3,
    ) -> Option<Vec3> {
        self.steps.iter().find_map(|step| {
            let tread = self.stair_box(step.position);
            tread.intersects(agent_box).then(|| {
                let x = pos.x.clamp(
                    tread.min.x + self.handrail_margin,
                    tread.max.x - self.handrail_margin,
                );
                Vec3::new(x, pos.y, tread.max.z + agent_half.z - SURFACE_EPS)
            })
        })
    }

    /// Where an agent sinking below the ground should stand instead.
    pub fn ground_correction_if_below(
        &self,
        pos:        Vec3,
        agent_box:  &Aabb,
        agent_half: Vec3,
    ) -> Option<Vec3> {
        (agent_box.min.z < self.ground_z)
            .then(|| Vec3::new(pos.x, pos.y, self.ground_z + agent_half.z))
    }

    // ── Predicates ────────────────────────────────────────────────────────

    /// The agent has ridden past the top corner.
    #[inline]
    pub fn is_finished(&self, pos: Vec3) -> bool {
        pos.z > self.zmax && pos.y > self.ymax
    }

    /// The agent overlaps the boarding footprint in plan view and its feet
    /// are between the ground and the first tread surface.
    pub fn ready_to_enter(&self, agent_box: &Aabb) -> bool {
        let bottom = agent_box.min.z;
        agent_box.intersects_xy(&self.boarding_footprint())
            && bottom >= self.entering_point.z - SURFACE_EPS
            && bottom <= self.exiting_point.z
    }

    /// Plan-view region between the entering and exiting points, as wide as
    /// a step.  Only `x`/`y` are meaningful.
    fn boarding_footprint(&self) -> Aabb {
        Aabb::new(
            Vec3::new(self.x0 - self.step_half.x, self.entering_point.y, f32::MIN),
            Vec3::new(self.x0 + self.step_half.x, self.exiting_point.y, f32::MAX),
        )
    }

    #[inline]
    fn within_lanes(&self, x: f32) -> bool {
        (x - self.x0).abs() <= self.step_half.x
    }

    // ── Forces ────────────────────────────────────────────────────────────

    /// Planar steering target for a walker at `pos`.
    ///
    /// In front of the belt and inside its width, walkers head for the
    /// exiting point; in the last pitch before it they coast (zero
    /// steering).  Everyone else heads for the entering point.
    pub fn steering_to_stairs(&self, pos: Vec3) -> Vec3 {
        let target = if self.within_lanes(pos.x) && pos.y >= self.entering_point.y {
            let last_pitch = self.exiting_point.y - STEP_DY;
            if pos.y <= last_pitch {
                self.exiting_point
            } else if pos.y < self.exiting_point.y {
                return Vec3::ZERO;
            } else {
                self.entering_point
            }
        } else {
            self.entering_point
        };
        let mut d = target - pos;
        d.z = 0.0;
        d
    }

    /// Lateral push from the balustrades.
    ///
    /// * Outside the housing's length: nothing.
    /// * Beside the belt: kernel-weighted push back toward the centerline.
    /// * Boarding zone (inside the lanes, before the exiting point): the
    ///   agent's lateral velocity is cancelled and it is pushed toward the
    ///   handrail it leans to.
    /// * Riding zone: nothing, unless the agent has almost no clearance
    ///   over the tread below, in which case it is nudged to the center.
    pub fn force_from_walls(&self, pos: Vec3, agent_box: &Aabb, vel: &mut Vec3) -> Vec3 {
        if pos.y < self.ramp.min.y || pos.y > self.ymax {
            return Vec3::ZERO;
        }
        let left = self.x0 - self.step_half.x;
        let right = self.x0 + self.step_half.x;

        if pos.x < left {
            let gap = (left - agent_box.max.x).max(0.0);
            return Vec3::new(weight(gap, WALL_RADIUS), 0.0, 0.0);
        }
        if pos.x > right {
            let gap = (agent_box.min.x - right).max(0.0);
            return Vec3::new(-weight(gap, WALL_RADIUS), 0.0, 0.0);
        }

        if pos.y > self.exiting_point.y {
            let clearance = agent_box.min.z - self.tread_height_at(pos.y);
            if clearance * CLEARANCE_GUARD < STEP_DZ {
                return Vec3::new((self.x0 - pos.x) * CENTERING_GAIN, 0.0, 0.0);
            }
            return Vec3::ZERO;
        }

        vel.x = 0.0;
        let side = if pos.x < self.x0 { -1.0 } else { 1.0 };
        let lean = 1.0 - ((pos.x - self.x0).abs() / self.step_half.x).min(1.0);
        Vec3::new(side * LANE_GAIN * lean, 0.0, 0.0)
    }

    /// Nominal tread surface height under longitudinal position `y`, along
    /// the unbroken incline.
    fn tread_height_at(&self, y: f32) -> f32 {
        let center = self.z0 + (y - self.y0) * (STEP_DZ / STEP_DY);
        center.min(self.zmax) + self.step_half.z
    }
}
