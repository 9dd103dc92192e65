//! Agent state and the value types it is built from.

mod agent;
mod common;

pub use agent::{
    AgentKind, AgentStats, Ammo, CombatAgent, Combatant, Hittable, NpcProfile, PlayerProfile,
    Vitals,
};
pub use common::{AgentId, Meter, MoveInput, Point, TeamId, Tick};
