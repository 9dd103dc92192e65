use std::collections::BTreeMap;

use super::effects::StatusHandle;
use crate::state::AgentId;

/// Match-wide handle for a status whose lifetime the caller controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalHandle(pub u64);

/// Maps conditional handles to the agent timer they control.
///
/// Owned by the match, so handles stay unique across every agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionalRegistry {
    next: u64,
    entries: BTreeMap<ConditionalHandle, (AgentId, StatusHandle)>,
}

impl ConditionalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, agent: AgentId, status: StatusHandle) -> ConditionalHandle {
        let handle = ConditionalHandle(self.next);
        self.next += 1;
        self.entries.insert(handle, (agent, status));
        handle
    }

    pub fn take(&mut self, handle: ConditionalHandle) -> Option<(AgentId, StatusHandle)> {
        self.entries.remove(&handle)
    }

    /// Drops the entry for a timer that ended on its own.
    pub fn forget_status(&mut self, agent: AgentId, status: StatusHandle) {
        self.entries.retain(|_, entry| *entry != (agent, status));
    }

    pub fn forget_agent(&mut self, agent: AgentId) {
        self.entries.retain(|_, (owner, _)| *owner != agent);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
