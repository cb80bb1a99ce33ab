//! `esc-sim` — tick loop orchestrator for the escalator flow simulator.
//!
//! # Two-phase tick
//!
//! ```text
//! dt = fixed_dt or clamp(caller dt, dt_bounds)
//! for pair in pairs:                      (parallel with the `parallel` feature)
//!   ① Belt       — advance steps by belt velocity · dt, recycle past the top.
//!   ② Repulsion  — every agent's push from a frozen copy of positions.
//!   ③ Agents     — ascending AgentId:
//!        finished   → respawn in the catchment disk, leave belt, count
//!        on stair   → ride with belt velocity (+ left-lane walk), re-seat
//!        walking    → board free tread │ land on ground │ forces:
//!                       steering, repulsion, walls, damping → clamp →
//!                       lane strategy if boarding → integrate
//! ④ Events      — finishing callbacks in pair order, clock advance,
//!                  snapshot every `output_interval_ticks`.
//! ```
//!
//! Repulsion in ② reads only pre-tick positions, so the result does not
//! depend on agent scan order.  Boarding in ③ checks occupancy against live
//! positions, so two agents cannot claim the same spot in one tick.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Advances escalator/crowd pairs on Rayon's thread pool. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use esc_sim::{NoopObserver, SimBuilder, SimulationConfig};
//!
//! let config = SimulationConfig { escalator_pad: 0, people_num: 50, ..Default::default() };
//! let mut sim = SimBuilder::new(config).build()?;
//! sim.run_ticks(2_000, 0.005, &mut NoopObserver);
//! println!("{:?}", sim.finished_counts());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod lanes;
pub mod observer;
pub mod on_stair;
pub mod pair;
pub mod sim;
pub mod snapshot;


pub use builder::SimBuilder;
pub use config::{ForceWeights, LaneStrategy, SimulationConfig};
pub use error::{SimError, SimResult};
pub use lanes::LaneAssignment;
pub use observer::{NoopObserver, SimObserver};
pub use on_stair::OnStairSet;
pub use pair::EscalatorPair;
pub use sim::Simulation;
pub use snapshot::{MinimalSnapshot, Snapshot, SnapshotHeader, SnapshotMeta};
