//! Membership of one crowd's agents in its belt's riding set.

use esc_core::AgentId;

/// Fixed-capacity bitset over a crowd's agent slots.
///
/// Agent ids are dense and stable for the whole run, so a flag per slot is
/// both the cheapest lookup and gives ascending iteration for free.
#[derive(Clone, Debug, PartialEq)]
pub struct OnStairSet {
    flags: Vec<bool>,
    len:   usize,
}

impl OnStairSet {
    pub fn new(capacity: usize) -> Self {
        Self { flags: vec![false; capacity], len: 0 }
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        self.flags.get(agent.index()).copied().unwrap_or(false)
    }

    /// Returns `true` if the agent was not already riding.
    pub fn insert(&mut self, agent: AgentId) -> bool {
        match self.flags.get_mut(agent.index()) {
            Some(flag) if !*flag => {
                *flag = true;
                self.len += 1;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if the agent was riding.
    pub fn remove(&mut self, agent: AgentId) -> bool {
        match self.flags.get_mut(agent.index()) {
            Some(flag) if *flag => {
                *flag = false;
                self.len -= 1;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Riding agents in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(|(i, _)| AgentId(i as u32))
    }

    /// Riding agent indices, ascending.
    pub fn indices(&self) -> Vec<u32> {
        self.iter().map(|a| a.0).collect()
    }
}
