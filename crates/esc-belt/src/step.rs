//! One step box on the belt.

use esc_core::{Aabb, StepId};
use glam::Vec3;

/// A single step.  Its index never changes; its position cycles through the
/// belt forever.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Slot in the belt's step array; used to find the step that follows it
    /// in wrap order.
    pub id: StepId,

    /// Box center.
    pub position: Vec3,

    /// Half-size, identical for every step on a belt.
    pub half_extents: Vec3,
}

impl Step {
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half(self.position, self.half_extents)
    }

    /// Height of the tread surface.
    #[inline]
    pub fn top(&self) -> f32 {
        self.position.z + self.half_extents.z
    }
}
