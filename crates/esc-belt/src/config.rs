//! Belt construction parameters.

use esc_core::Aabb;
use esc_core::error::ensure_nonzero;
use glam::Vec3;

use crate::{BeltError, BeltResult};

/// Horizontal distance between consecutive step centers.
pub const STEP_DY: f32 = 0.226;

/// Vertical distance between consecutive step centers.
pub const STEP_DZ: f32 = 0.128;

/// Offset of the first step's reference point from the belt position.
pub(crate) const ORIGIN_OFFSET: Vec3 = Vec3::new(0.0, 0.49, -0.22);

/// Ground height relative to the belt position.
pub(crate) const GROUND_OFFSET: f32 = -0.24;

/// Steps span this fraction of the ramp's lateral size.
pub(crate) const STEP_WIDTH_FRACTION: f32 = 0.85;

/// Outer geometry of the escalator housing.  Agents never spawn inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct RampGeometry {
    /// World-space bounding box.
    pub bounds: Aabb,
}

impl RampGeometry {
    pub fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    /// A housing sized for a belt of `count` steps at `position`, 1 m wide,
    /// from just ahead of the first step to a short landing past the top,
    /// with room for the balustrade above the treads.
    pub fn synthetic(position: Vec3, count: usize) -> Self {
        let origin = position + ORIGIN_OFFSET;
        let rise = count as f32 * STEP_DZ;
        let run = count as f32 * STEP_DY;
        let min = Vec3::new(position.x - 0.5, origin.y - 0.6, position.z + GROUND_OFFSET);
        let max = Vec3::new(position.x + 0.5, origin.y + run + 0.6, origin.z + rise + 1.0);
        Self { bounds: Aabb::new(min, max) }
    }

    /// Lateral, longitudinal, and vertical size of the housing.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.bounds.size()
    }
}

/// Everything needed to build one [`EscalatorBelt`][crate::EscalatorBelt].
#[derive(Clone, Debug, PartialEq)]
pub struct BeltConfig {
    /// Display identifier, e.g. `Esca30-(0,0)`.
    pub id: String,

    /// World position of the escalator.
    pub position: Vec3,

    /// Number of visible stairs.
    pub count: usize,

    /// Extra steps beyond `count` that keep the belt visually continuous.
    pub pad: usize,

    /// Lateral keep-out from each step edge when snapping agents onto a
    /// tread.  Default: 0.1.
    pub handrail_margin: f32,

    /// Outer housing.  `None` uses [`RampGeometry::synthetic`].
    pub ramp: Option<RampGeometry>,
}

impl BeltConfig {
    pub fn new(id: impl Into<String>, position: Vec3, count: usize, pad: usize) -> Self {
        Self {
            id: id.into(),
            position,
            count,
            pad,
            handrail_margin: 0.1,
            ramp: None,
        }
    }

    /// The housing this belt will use.
    pub fn ramp(&self) -> RampGeometry {
        self.ramp
            .clone()
            .unwrap_or_else(|| RampGeometry::synthetic(self.position, self.count))
    }

    pub fn validate(&self) -> BeltResult<()> {
        ensure_nonzero("stair count", self.count)?;
        let total = self.count + self.pad;
        if total < 2 {
            return Err(BeltError::TooFewSteps(total));
        }
        let bounds = self.ramp().bounds;
        let size = bounds.size();
        if !(bounds.min.is_finite() && bounds.max.is_finite())
            || size.x <= 0.0
            || size.y <= 0.0
            || size.z <= 0.0
        {
            return Err(BeltError::BadRamp {
                min: bounds.min.to_array(),
                max: bounds.max.to_array(),
            });
        }
        let width = size.x * STEP_WIDTH_FRACTION;
        if !(self.handrail_margin >= 0.0) || self.handrail_margin * 2.0 >= width {
            return Err(BeltError::MarginTooWide { margin: self.handrail_margin, width });
        }
        Ok(())
    }
}
