//! Authoritative combat rules for a networked action game.
//!
//! `combat-core` decides whether an attack connects, how much damage it
//! deals, which crowd-control ailment the victim ends up in, which timed
//! statuses apply, and which attack a player's next input selects. It never
//! performs I/O: animation state, attack tables and team rules are read
//! through the oracles in [`env`], and everything the outside world should
//! react to leaves as a [`CombatEvent`]. All state lives in a
//! [`MatchContext`] advanced one fixed step at a time.
pub mod ailment;
pub mod attack;
pub mod combo;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod hit;
pub mod state;
pub mod status;

#[cfg(test)]
mod testing;

pub use ailment::{AilmentKind, AilmentTimer, Resolution, ResetPolicy};
pub use attack::{
    AttackDefinition, AttackFlags, AttackId, AttackTable, CancelFlags, ComboCondition, HitCounter,
    PhaseThresholds, WeaponId,
};
pub use combo::{AttackPhase, InputHistory, InputToken, Selection};
pub use config::CombatConfig;
pub use engine::{Authority, CombatEvent, MatchContext, ReplicatedAgent, ReplicatedFields};
pub use env::{
    AnimationPlayer, AttackCatalog, ClipId, CombatEnv, Env, OracleError, Ruleset, TeamRules,
};
pub use error::{CombatError, ErrorContext, ErrorSeverity, GameError};
pub use hit::{HitDelivery, HitOutcome, HitRejection, HitReport, HitRequest, MitigationTier};
pub use state::{
    AgentId, AgentKind, AgentStats, Ammo, CombatAgent, Combatant, Hittable, Meter, MoveInput,
    Point, TeamId, Tick, Vitals,
};
pub use status::{ConditionalHandle, StatusEffects, StatusHandle, StatusKind, StatusPayload};
