//! `esc-core` — foundational types for the escalator flow simulator.
//!
//! This crate is a dependency of every other `esc-*` crate.  It has no
//! `esc-*` dependencies and minimal external ones (`glam`, `rand`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `StepId`, `PairId`                         |
//! | [`geom`]        | `Aabb` axis-aligned box over `glam::Vec3`             |
//! | [`kernel`]      | Compact smoothing weight shared by all soft forces    |
//! | [`time`]        | `SimClock`, `DtBounds`                                |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`error`]       | `EscError`, `EscResult`                               |
//!
//! # Coordinates
//!
//! Z is up.  Y runs along the direction of belt travel, X is lateral.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geom;
pub mod ids;
pub mod kernel;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{EscError, EscResult};
pub use geom::Aabb;
pub use glam::Vec3;
pub use ids::{AgentId, PairId, StepId};
pub use kernel::weight;
pub use rng::SimRng;
pub use time::{DtBounds, SimClock};
