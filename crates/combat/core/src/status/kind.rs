//! Status kinds and how each one touches an agent.

/// Every timed modifier the engine knows how to run.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Multiplicative accumulators
    // ========================================================================
    DamageUp,
    DamageDown,
    DamageReceivedUp,
    DamageReceivedDown,
    DefenseUp,
    DefenseDown,
    HealingUp,
    HealingDown,

    // ========================================================================
    // Flat + percentage channels
    // ========================================================================
    MovementSpeedUp,
    Slow,
    AttackSpeedUp,
    AttackSpeedDown,
    /// Lengthens ability cooldowns.
    CooldownUp,
    /// Shortens ability cooldowns.
    CooldownDown,

    // ========================================================================
    // Per-tick effects
    // ========================================================================
    Burn,
    Poison,
    Drain,
    Heal,
    StaminaRegen,

    // ========================================================================
    // Markers (restrict behaviour, no numeric effect)
    // ========================================================================
    Root,
    Silence,
    Fear,
}

/// Named multiplicative accumulator a status pushes a factor onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Accumulator {
    Damage,
    DamageReceived,
    Defense,
    Healing,
}

/// Speed-like channel combining flat and percentage contributions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    MovementSpeed,
    AttackSpeed,
    Cooldown,
}

/// Resource a periodic status drains or restores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeriodicTarget {
    HealthLoss,
    HealthGain,
    StaminaGain,
}

/// Whether a status raises or lowers what it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Increase,
    Decrease,
}

impl Direction {
    pub const fn sign(self) -> f32 {
        match self {
            Self::Increase => 1.0,
            Self::Decrease => -1.0,
        }
    }
}

/// How a status kind is applied while it is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectClass {
    Multiplier(Accumulator, Direction),
    Channel(Channel, Direction),
    Periodic(PeriodicTarget),
    Marker,
}

impl StatusKind {
    pub const fn effect(self) -> EffectClass {
        use Accumulator as A;
        use Direction::{Decrease, Increase};
        use StatusKind::*;
        match self {
            DamageUp => EffectClass::Multiplier(A::Damage, Increase),
            DamageDown => EffectClass::Multiplier(A::Damage, Decrease),
            DamageReceivedUp => EffectClass::Multiplier(A::DamageReceived, Increase),
            DamageReceivedDown => EffectClass::Multiplier(A::DamageReceived, Decrease),
            DefenseUp => EffectClass::Multiplier(A::Defense, Increase),
            DefenseDown => EffectClass::Multiplier(A::Defense, Decrease),
            HealingUp => EffectClass::Multiplier(A::Healing, Increase),
            HealingDown => EffectClass::Multiplier(A::Healing, Decrease),
            MovementSpeedUp => EffectClass::Channel(Channel::MovementSpeed, Increase),
            Slow => EffectClass::Channel(Channel::MovementSpeed, Decrease),
            AttackSpeedUp => EffectClass::Channel(Channel::AttackSpeed, Increase),
            AttackSpeedDown => EffectClass::Channel(Channel::AttackSpeed, Decrease),
            CooldownUp => EffectClass::Channel(Channel::Cooldown, Increase),
            CooldownDown => EffectClass::Channel(Channel::Cooldown, Decrease),
            Burn | Poison | Drain => EffectClass::Periodic(PeriodicTarget::HealthLoss),
            Heal => EffectClass::Periodic(PeriodicTarget::HealthGain),
            StaminaRegen => EffectClass::Periodic(PeriodicTarget::StaminaGain),
            Root | Silence | Fear => EffectClass::Marker,
        }
    }

    /// Kinds that a negative-status-immune agent shrugs off.
    pub const fn is_negative(self) -> bool {
        use StatusKind::*;
        matches!(
            self,
            DamageReceivedUp
                | DefenseDown
                | Burn
                | Poison
                | Drain
                | Slow
                | Root
                | Silence
                | Fear
                | AttackSpeedDown
                | CooldownUp
        )
    }

    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Burn | Self::Poison | Self::Drain)
    }
}
