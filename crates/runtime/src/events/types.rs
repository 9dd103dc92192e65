//! Event payloads published by the simulation worker.

use serde::{Deserialize, Serialize};

use combat_core::{CombatEvent, ReplicatedAgent, Tick};

/// Dirty agents captured after one worker command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationEvent {
    pub tick: Tick,
    pub agents: Vec<ReplicatedAgent>,
}

/// One combat event, stamped with the tick it happened on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub tick: Tick,
    pub event: CombatEvent,
}
