use std::collections::HashSet;

use super::domain::{Agent, AgentId};
use super::service::SchedulingError;

/// Roster of advisory agents with their pending-appointment counts.
///
/// Registration order is preserved: candidate listings and load tie-breaks
/// iterate the roster in the order agents were registered, so selection is
/// deterministic.
#[derive(Debug, Default)]
pub struct AgentPool {
    entries: Vec<PoolEntry>,
}

#[derive(Debug)]
struct PoolEntry {
    agent: Agent,
    pending: u32,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent to the roster. Re-registering an existing id is a no-op
    /// so a configuration reload cannot reset a live pending count.
    pub fn register(&mut self, agent: Agent) {
        if self.entry(&agent.id).is_none() {
            self.entries.push(PoolEntry { agent, pending: 0 });
        }
    }

    pub fn contains(&self, id: &AgentId) -> bool {
        self.entry(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.entries.iter().map(|entry| &entry.agent)
    }

    pub fn pending_count(&self, id: &AgentId) -> Option<u32> {
        self.entry(id).map(|entry| entry.pending)
    }

    /// Agents not in the `busy` set, in registration order. The caller derives
    /// `busy` from the appointment index for the slot in question.
    pub fn available(&self, busy: &HashSet<AgentId>) -> Vec<AgentId> {
        self.entries
            .iter()
            .filter(|entry| !busy.contains(&entry.agent.id))
            .map(|entry| entry.agent.id.clone())
            .collect()
    }

    /// The candidate with the minimal pending count. Ties go to the earliest
    /// registered candidate; `min_by_key` keeps the first minimum, and
    /// `candidates` comes out of [`Self::available`] in registration order.
    pub fn least_loaded(&self, candidates: &[AgentId]) -> Option<AgentId> {
        candidates
            .iter()
            .filter_map(|id| self.entry(id))
            .min_by_key(|entry| entry.pending)
            .map(|entry| entry.agent.id.clone())
    }

    pub fn increment(&mut self, id: &AgentId) -> Result<(), SchedulingError> {
        let entry = self
            .entry_mut(id)
            .ok_or_else(|| SchedulingError::AgentNotFound(id.0.clone()))?;
        entry.pending += 1;
        Ok(())
    }

    pub fn decrement(&mut self, id: &AgentId) -> Result<(), SchedulingError> {
        let entry = self
            .entry_mut(id)
            .ok_or_else(|| SchedulingError::AgentNotFound(id.0.clone()))?;
        entry.pending = entry.pending.saturating_sub(1);
        Ok(())
    }

    fn entry(&self, id: &AgentId) -> Option<&PoolEntry> {
        self.entries.iter().find(|entry| &entry.agent.id == id)
    }

    fn entry_mut(&mut self, id: &AgentId) -> Option<&mut PoolEntry> {
        self.entries.iter_mut().find(|entry| &entry.agent.id == id)
    }
}
