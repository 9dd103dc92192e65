use bitflags::bitflags;

bitflags! {
    /// Input categories allowed to interrupt an attack during its recovery phase.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct CancelFlags: u8 {
        const BY_LIGHT   = 1 << 0;
        const BY_HEAVY   = 1 << 1;
        const BY_ABILITY = 1 << 2;
        const BY_DODGE   = 1 << 3;
        const BY_FLASH   = 1 << 4;
    }
}

bitflags! {
    /// Behavioural markers on an attack definition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AttackFlags: u8 {
        /// Chained follow-up; forces a stunned victim into Stagger.
        const FOLLOW_UP    = 1 << 0;
        /// Damage scales with how long the input was held.
        const CHARGED      = 1 << 1;
        /// Flash attack clip; re-applies Knockup without resetting the juggle counter.
        const FLASH        = 1 << 2;
        const DODGE        = 1 << 3;
        /// Counter performed out of a hit reaction.
        const HIT_REACTION = 1 << 4;
        /// Connecting hit grabs the victim.
        const GRAB         = 1 << 5;
    }
}

impl AttackFlags {
    /// Attacks that start a fresh combo instead of extending the input history.
    pub fn resets_history(self) -> bool {
        self.intersects(Self::DODGE | Self::HIT_REACTION | Self::FLASH)
    }
}
