//! Crowd-wide body and motion parameters.

use esc_core::error::{ensure_nonzero, ensure_positive};
use glam::Vec3;

use crate::CrowdResult;

/// Parameters shared by every agent in one crowd.
///
/// Derived quantities (separation, repulsion radius, catchment radius) are
/// computed from these by [`Crowd::new`][crate::Crowd::new] and are not
/// independently tunable.
#[derive(Clone, Debug, PartialEq)]
pub struct CrowdConfig {
    /// Number of agents.  Fixed for the lifetime of the crowd.
    pub count: usize,

    /// Lateral (X) body size.  Default: 0.2.
    pub width: f32,

    /// Front-to-back (Y) body size.  Default: 0.1.
    pub depth: f32,

    /// Vertical (Z) body size.  Default: 0.6.
    pub height: f32,

    /// Speed cap for free-walking agents.  Default: 1.0.
    pub max_speed: f32,

    /// Center of the spawn catchment disk.  Its `z` is the ground height.
    pub position: Vec3,
}

impl Default for CrowdConfig {
    fn default() -> Self {
        Self {
            count:     100,
            width:     0.2,
            depth:     0.1,
            height:    0.6,
            max_speed: 1.0,
            position:  Vec3::ZERO,
        }
    }
}

impl CrowdConfig {
    pub fn validate(&self) -> CrowdResult<()> {
        ensure_nonzero("crowd size", self.count)?;
        ensure_positive("body width", self.width as f64)?;
        ensure_positive("body depth", self.depth as f64)?;
        ensure_positive("body height", self.height as f64)?;
        ensure_positive("crowd max speed", self.max_speed as f64)?;
        Ok(())
    }

    /// Half-size of every agent's box.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width * 0.5, self.depth * 0.5, self.height * 0.5)
    }

    /// Minimum center distance accepted during placement: three body widths.
    #[inline]
    pub fn min_separation(&self) -> f32 {
        self.width.max(self.depth) * 3.0
    }

    /// Support radius of the repulsion kernel: three minimum separations.
    #[inline]
    pub fn repulsion_radius(&self) -> f32 {
        self.min_separation() * 3.0
    }

    /// Radius of the spawn disk: `max(30/√count, 1)` minimum separations,
    /// never below 10.
    #[inline]
    pub fn catchment_radius(&self) -> f32 {
        let spread = (30.0 / (self.count as f32).sqrt()).max(1.0);
        (spread * self.min_separation()).max(10.0)
    }
}
