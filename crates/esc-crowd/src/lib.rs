//! `esc-crowd` — crowd storage and agent-agent interaction.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`store`]    | `AgentStore` — SoA positions and velocities                 |
//! | [`config`]   | `CrowdConfig` — body dimensions, count, speed, origin        |
//! | [`crowd`]    | `Crowd` — placement, respawn sampling, repulsion, occupancy  |
//! | [`error`]    | `CrowdError`, `CrowdResult<T>`                               |
//!
//! # Interaction model
//!
//! Every agent is an axis-aligned box of fixed half-extents centered on its
//! position.  Agents push each other apart with a kernel-weighted repulsion
//! that acts in the horizontal plane only.  The scan is O(N) per agent and
//! O(N²) per tick, which is fine for crowds in the low hundreds.

pub mod config;
pub mod crowd;
pub mod error;
pub mod store;


pub use config::CrowdConfig;
pub use crowd::Crowd;
pub use error::{CrowdError, CrowdResult};
pub use store::AgentStore;
