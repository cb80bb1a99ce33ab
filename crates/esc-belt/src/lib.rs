//! `esc-belt` — the moving stair belt of one escalator.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`config`]  | `BeltConfig`, `RampGeometry`, pitch and layout constants         |
//! | [`step`]    | `Step` — one box on the belt                                     |
//! | [`belt`]    | `EscalatorBelt` — transport, recycling, collision, forces        |
//! | [`error`]   | `BeltError`, `BeltResult<T>`                                     |
//!
//! # Belt model
//!
//! ```text
//!        z                                    ymax, zmax ─┐
//!        ▲                               ┌──┐             │ steps recycle
//!        │                          ┌──┐ │  │  ◄──────────┘ past this corner
//!        │                     ┌──┐ │  │
//!        │   exiting ●    ┌──┐ │  │            every step moves (0, dy, dz)
//!  ground├──●─────────┌──┐│  │                 per second, one pitch apart
//!        │ entering   │  │
//!        └───────────────────────────────────────────────► y
//! ```
//!
//! The belt owns `count + pad` steps laid out one pitch apart.  A step that
//! passes the top corner is moved to one pitch below the step that follows
//! it in wrap order, so spacing never drifts no matter what `dt` the caller
//! integrates with.  Near the top the vertical speed eases off so steps
//! flatten into the landing.

pub mod belt;
pub mod config;
pub mod error;
pub mod step;


pub use belt::EscalatorBelt;
pub use config::{BeltConfig, RampGeometry, STEP_DY, STEP_DZ};
pub use error::{BeltError, BeltResult};
pub use step::Step;
