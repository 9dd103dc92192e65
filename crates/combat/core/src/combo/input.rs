use arrayvec::ArrayVec;

use crate::attack::CancelFlags;
use crate::config::CombatConfig;

/// Discrete attack input sent by a player (or requested over the network).
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
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputToken {
    LightAttack,
    HeavyAttack,
    Ability1,
    Ability2,
    Ability3,
    Ability4,
    Dodge,
    FlashAttack,
}

impl InputToken {
    /// Cancel category this input falls into.
    pub const fn cancel_flag(self) -> CancelFlags {
        match self {
            Self::LightAttack => CancelFlags::BY_LIGHT,
            Self::HeavyAttack => CancelFlags::BY_HEAVY,
            Self::Ability1 | Self::Ability2 | Self::Ability3 | Self::Ability4 => {
                CancelFlags::BY_ABILITY
            }
            Self::Dodge => CancelFlags::BY_DODGE,
            Self::FlashAttack => CancelFlags::BY_FLASH,
        }
    }
}

/// Tokens of the combo in progress, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputHistory {
    tokens: ArrayVec<InputToken, { CombatConfig::MAX_COMBO_CHAIN }>,
}

impl InputHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a token; the oldest token is dropped once the chain limit is hit.
    pub fn push(&mut self, token: InputToken) {
        if self.tokens.is_full() {
            self.tokens.remove(0);
        }
        self.tokens.push(token);
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn as_slice(&self) -> &[InputToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
