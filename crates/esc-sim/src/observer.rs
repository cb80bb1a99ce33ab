//! Simulation observer trait for progress reporting and data collection.

use esc_core::{AgentId, PairId, SimClock};

use crate::Simulation;

/// Callbacks invoked by [`Simulation`] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — finishing counter
///
/// ```rust,ignore
/// struct Counter { total: u64 }
///
/// impl SimObserver for Counter {
///     fn on_agent_finished(&mut self, _pair: PairId, _agent: AgentId, _count: u64) {
///         self.total += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _clock: &SimClock) {}

    /// Called once per agent that reached the top this tick, after every pair
    /// has been advanced, in pair order then agent order.
    ///
    /// `count` is the pair's finishing counter including this agent.  This
    /// is the hook for counter labels and the arrival flash.
    fn on_agent_finished(&mut self, _pair: PairId, _agent: AgentId, _count: u64) {}

    /// Called at the end of each tick.  `clock` already includes this tick;
    /// `finished` is the number of agents that finished across all pairs.
    fn on_tick_end(&mut self, _clock: &SimClock, _finished: usize) {}

    /// Called every `config.output_interval_ticks` ticks with read access to
    /// the whole simulation, so writers can pull whatever snapshot form they
    /// need.
    fn on_snapshot(&mut self, _clock: &SimClock, _sim: &Simulation) {}

    /// Called once at the end of [`Simulation::run_ticks`].
    fn on_sim_end(&mut self, _clock: &SimClock) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to drive ticks but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
