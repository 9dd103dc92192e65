//! Host inputs forwarded to the simulation worker.

use serde::{Deserialize, Serialize};

use combat_core::{MoveInput, WeaponId};

/// Identifier of an in-flight projectile; each one owns a hit counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

/// Per-agent input sampled by the host between steps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum AgentInput {
    Blocking(bool),
    Move(MoveInput),
    Aiming(bool),
    /// Animation blend into the next attack in progress.
    Transitioning(bool),
    /// How long the current heavy attack has been held.
    Charge(u32),
    SwitchWeapon(WeaponId),
    ActivateRage,
    /// Server acknowledged the client's last action.
    Acknowledge,
}
