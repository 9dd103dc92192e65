use std::fmt;

use arrayvec::ArrayVec;

use super::flags::{AttackFlags, CancelFlags};
use crate::ailment::AilmentKind;
use crate::combo::{AttackPhase, InputToken};
use crate::config::CombatConfig;
use crate::env::ClipId;
use crate::hit::HitDelivery;
use crate::state::MoveInput;
use crate::status::StatusPayload;

/// Catalog identifier of an attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackId(pub u32);

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attack:{}", self.0)
    }
}

/// Identifier of a weapon; each weapon owns an ordered attack table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponId(pub u32);

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "weapon:{}", self.0)
    }
}

/// Directional requirement on the move input when the attack is selected.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComboCondition {
    #[default]
    None,
    Forward,
    Back,
    Left,
    Right,
}

impl ComboCondition {
    pub fn is_met(self, input: MoveInput, threshold: f32) -> bool {
        match self {
            Self::None => true,
            Self::Forward => input.y > threshold,
            Self::Back => -input.y > threshold,
            Self::Right => input.x > threshold,
            Self::Left => -input.x > threshold,
        }
    }
}

/// Normalized animation times at which an attack changes phase.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseThresholds {
    pub attack_start: f32,
    pub recovery_start: f32,
    pub recovery_end: f32,
}

impl PhaseThresholds {
    pub const fn new(attack_start: f32, recovery_start: f32, recovery_end: f32) -> Self {
        Self {
            attack_start,
            recovery_start,
            recovery_end,
        }
    }

    pub fn phase_at(&self, progress: f32) -> AttackPhase {
        if progress < self.attack_start {
            AttackPhase::Anticipation
        } else if progress < self.recovery_start {
            AttackPhase::Attacking
        } else if progress < self.recovery_end {
            AttackPhase::Recovery
        } else {
            AttackPhase::AtRest
        }
    }
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self::new(0.25, 0.6, 1.0)
    }
}

/// Static description of one attack in a weapon table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackDefinition {
    pub id: AttackId,
    pub name: String,
    /// Input sequence ending with the token that selects this attack.
    pub inputs: ArrayVec<InputToken, { CombatConfig::MAX_COMBO_CHAIN }>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: ComboCondition,
    #[cfg_attr(feature = "serde", serde(default))]
    pub must_be_aiming: bool,
    pub damage: f32,
    /// How the attack usually connects; hosts pick the hit path from this.
    #[cfg_attr(feature = "serde", serde(default))]
    pub delivery: HitDelivery,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stamina_cost: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ammo_cost: u16,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ailment: AilmentKind,
    /// Which successive hits on the same victim may apply the ailment.
    /// Hits past the end of the list are eligible.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ailment_hits: ArrayVec<bool, { CombatConfig::MAX_AILMENT_HITS }>,
    /// Hits allowed per victim for one attack instance.
    pub hit_limit: u8,
    /// Minimum spacing between repeated hits on one victim.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_hit_interval_millis: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cancel: CancelFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: AttackFlags,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phases: PhaseThresholds,
    /// Applied to a victim on a connecting hit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hit: Vec<StatusPayload>,
    /// Applied to a teammate caught by the attack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_teammate: Vec<StatusPayload>,
}

impl AttackDefinition {
    pub fn new(id: AttackId, name: impl Into<String>, inputs: &[InputToken], damage: f32) -> Self {
        Self {
            id,
            name: name.into(),
            inputs: inputs
                .iter()
                .copied()
                .take(CombatConfig::MAX_COMBO_CHAIN)
                .collect(),
            condition: ComboCondition::None,
            must_be_aiming: false,
            damage,
            delivery: HitDelivery::Melee,
            stamina_cost: 0.0,
            ammo_cost: 0,
            ailment: AilmentKind::None,
            ailment_hits: ArrayVec::new(),
            hit_limit: 1,
            min_hit_interval_millis: 0,
            cancel: CancelFlags::empty(),
            flags: AttackFlags::empty(),
            phases: PhaseThresholds::default(),
            on_hit: Vec::new(),
            on_teammate: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ailment(mut self, ailment: AilmentKind) -> Self {
        self.ailment = ailment;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: ComboCondition) -> Self {
        self.condition = condition;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: AttackFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlags) -> Self {
        self.cancel |= cancel;
        self
    }

    #[must_use]
    pub fn with_hit_limit(mut self, hit_limit: u8) -> Self {
        self.hit_limit = hit_limit;
        self
    }

    #[must_use]
    pub fn with_on_hit(mut self, payload: StatusPayload) -> Self {
        self.on_hit.push(payload);
        self
    }

    #[must_use]
    pub fn with_on_teammate(mut self, payload: StatusPayload) -> Self {
        self.on_teammate.push(payload);
        self
    }

    #[must_use]
    pub fn aiming(mut self) -> Self {
        self.must_be_aiming = true;
        self
    }

    #[must_use]
    pub fn with_stamina_cost(mut self, stamina_cost: f32) -> Self {
        self.stamina_cost = stamina_cost;
        self
    }

    #[must_use]
    pub fn with_ammo_cost(mut self, ammo_cost: u16) -> Self {
        self.ammo_cost = ammo_cost;
        self.delivery = HitDelivery::Projectile;
        self
    }

    pub fn clip(&self) -> ClipId {
        ClipId::Attack(self.id)
    }

    /// Whether the `hit_number`-th hit (1-based) on a victim may apply the ailment.
    pub fn ailment_eligible(&self, hit_number: u32) -> bool {
        let index = hit_number.saturating_sub(1) as usize;
        self.ailment_hits.get(index).copied().unwrap_or(true)
    }

    pub fn is_follow_up(&self) -> bool {
        self.flags.contains(AttackFlags::FOLLOW_UP)
    }

    pub fn is_flash(&self) -> bool {
        self.flags.contains(AttackFlags::FLASH)
    }

    pub fn is_dodge(&self) -> bool {
        self.flags.contains(AttackFlags::DODGE)
    }

    /// Whether this attack finishes the sequence `history` + `token`.
    pub fn completes(&self, history: &[InputToken], token: InputToken) -> bool {
        match self.inputs.split_last() {
            Some((last, prefix)) => *last == token && prefix == history,
            None => false,
        }
    }
}
