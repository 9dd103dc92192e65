//! Damage formula and defense mitigation.

use crate::attack::{AttackDefinition, AttackFlags};
use crate::config::CombatConfig;
use crate::state::{CombatAgent, Tick};

/// How much of a hit the victim's defense and guard absorbed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MitigationTier {
    /// Defense absorbs everything; no HP loss and no hit reaction.
    Full,
    /// Damage is split between defense and HP.
    Partial,
    /// Blocking with no defense left: full damage plus stamina drain.
    GuardBroken,
    Unprotected,
}

/// Signed meter changes a hit will apply to its victim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mitigation {
    pub tier: MitigationTier,
    pub hp_delta: f32,
    pub defense_delta: f32,
    pub stamina_delta: f32,
    pub hit_reaction: bool,
    /// Stamina dropped below the guard threshold.
    pub force_stagger: bool,
}

/// Signed (non-positive) damage before mitigation.
pub fn raw_damage(
    attack: &AttackDefinition,
    attacker: &CombatAgent,
    victim: &CombatAgent,
    caller_multiplier: f32,
    config: &CombatConfig,
    now: Tick,
) -> f32 {
    let charge = if attack.flags.contains(AttackFlags::CHARGED) {
        config.charge_scalar(attacker.charge_millis)
    } else {
        1.0
    };
    let rage = if attacker.is_raging(now) {
        config.rage_damage_scalar
    } else {
        1.0
    };
    let amount = attack.damage
        * attacker.statuses.damage_multiplier()
        * caller_multiplier
        * charge
        * rage
        * victim.statuses.damage_received_multiplier();
    -amount.max(0.0)
}

/// Splits `damage` across the victim's defense, stamina and HP.
pub fn mitigate(damage: f32, victim: &CombatAgent, config: &CombatConfig) -> Mitigation {
    let amount = (-damage).max(0.0);
    let defense = victim.vitals.defense;
    let defense_scale = victim.statuses.defense_multiplier();

    if defense.current > 0.0
        && (victim.blocking || defense.fraction() >= config.full_defense_fraction)
    {
        let loss = if defense_scale > 0.0 {
            amount * config.full_defense_absorb_ratio / defense_scale
        } else {
            amount
        };
        return Mitigation {
            tier: MitigationTier::Full,
            hp_delta: 0.0,
            defense_delta: -loss.min(defense.current),
            stamina_delta: 0.0,
            hit_reaction: false,
            force_stagger: false,
        };
    }

    if defense.current > 0.0 {
        let share = (amount * config.partial_defense_ratio * defense_scale).clamp(0.0, amount);
        let absorbed = share.min(defense.current);
        return Mitigation {
            tier: MitigationTier::Partial,
            hp_delta: -(amount - absorbed),
            defense_delta: -absorbed,
            stamina_delta: 0.0,
            hit_reaction: true,
            force_stagger: false,
        };
    }

    if victim.blocking {
        let drain = amount * config.block_stamina_drain_ratio;
        let remaining = (victim.vitals.stamina.current - drain).max(0.0);
        return Mitigation {
            tier: MitigationTier::GuardBroken,
            hp_delta: -amount,
            defense_delta: 0.0,
            stamina_delta: -drain,
            hit_reaction: true,
            force_stagger: remaining < config.block_stagger_stamina_threshold,
        };
    }

    Mitigation {
        tier: MitigationTier::Unprotected,
        hp_delta: -amount,
        defense_delta: 0.0,
        stamina_delta: 0.0,
        hit_reaction: true,
        force_stagger: false,
    }
}
