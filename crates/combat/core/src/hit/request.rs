use crate::ailment::AilmentKind;
use crate::attack::AttackId;
use crate::state::{AgentId, Point};

use super::damage::MitigationTier;

/// How a hit reached its victim.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitDelivery {
    /// Weapon hitbox overlap; shakes the victim and can interrupt it.
    #[default]
    Melee,
    /// Projectile impact; no shake and no same-tick stagger bookkeeping.
    Projectile,
}

/// A collision reported by the host, to be resolved into damage.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitRequest {
    pub attacker: AgentId,
    pub victim: AgentId,
    pub attack: AttackId,
    pub delivery: HitDelivery,
    pub impact_point: Point,
    pub source_point: Point,
    /// Extra scalar from the caller (weak spots, falloff, ...).
    pub damage_multiplier: f32,
}

impl HitRequest {
    pub fn melee(attacker: AgentId, victim: AgentId, attack: AttackId) -> Self {
        Self {
            attacker,
            victim,
            attack,
            delivery: HitDelivery::Melee,
            impact_point: Point::ORIGIN,
            source_point: Point::ORIGIN,
            damage_multiplier: 1.0,
        }
    }

    pub fn projectile(attacker: AgentId, victim: AgentId, attack: AttackId) -> Self {
        Self {
            delivery: HitDelivery::Projectile,
            ..Self::melee(attacker, victim, attack)
        }
    }

    #[must_use]
    pub fn at(mut self, impact_point: Point, source_point: Point) -> Self {
        self.impact_point = impact_point;
        self.source_point = source_point;
        self
    }

    #[must_use]
    pub fn with_multiplier(mut self, damage_multiplier: f32) -> Self {
        self.damage_multiplier = damage_multiplier;
        self
    }
}

/// Expected reasons a hit does not register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum HitRejection {
    AttackerDead,
    VictimDead,
    AttackerInHitStop,
    /// Victim is held by someone else, or the attacker is grabbing another target.
    GrabConflict,
    /// Teams may not damage each other; teammate statuses were applied instead.
    FriendlyFire,
    HitLimitZero,
    /// Hit limit reached or minimum interval not elapsed for this victim.
    RepeatHitGated,
    Invincible,
    /// The attacker was interrupted by a melee hit on this same tick.
    AttackerStaggered,
}

/// What a registered hit did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitReport {
    /// 1-based hit number on this victim for the attack instance.
    pub hit_number: u32,
    pub tier: MitigationTier,
    /// Signed HP change actually applied to the victim.
    pub hp_delta: f32,
    pub ailment: AilmentKind,
    pub killed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HitOutcome {
    Registered(HitReport),
    Rejected(HitRejection),
}

impl HitOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}
