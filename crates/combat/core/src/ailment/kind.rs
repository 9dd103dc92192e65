/// Exclusive control-loss state of an agent.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AilmentKind {
    #[default]
    None,
    Stun,
    Stagger,
    Knockdown,
    Knockup,
    Pull,
    Grab,
    Death,
}

/// What ends an ailment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResetPolicy {
    /// Nothing to reset.
    Never,
    /// Ends after a configured duration.
    FixedTimer,
    /// Ends on landing or once the juggle hit ceiling is reached.
    HitCountLimited,
    /// Ends once the reaction clip stops playing.
    AnimationBound,
    /// Only a respawn clears it.
    Terminal,
}

impl AilmentKind {
    pub const fn reset_policy(self) -> ResetPolicy {
        match self {
            Self::None => ResetPolicy::Never,
            Self::Stun | Self::Knockdown => ResetPolicy::FixedTimer,
            Self::Knockup => ResetPolicy::HitCountLimited,
            Self::Stagger | Self::Pull | Self::Grab => ResetPolicy::AnimationBound,
            Self::Death => ResetPolicy::Terminal,
        }
    }

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    pub const fn is_dead(self) -> bool {
        matches!(self, Self::Death)
    }

    /// Ailments that leave the agent unable to act.
    pub const fn disables_actions(self) -> bool {
        !matches!(self, Self::None)
    }
}
