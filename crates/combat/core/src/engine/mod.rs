//! Match-level orchestration.
//!
//! [`MatchContext`] owns every agent of one match together with the trackers
//! that span agents (melee hit counters, conditional status handles). Hosts
//! drive it with hit requests, attack tokens and one [`MatchContext::step`]
//! per fixed simulation step, then drain events and replication snapshots.

mod context;
mod events;
mod replication;
mod step;

pub use context::{Authority, MatchContext};
pub use events::CombatEvent;
pub use replication::{ReplicatedAgent, ReplicatedFields};
