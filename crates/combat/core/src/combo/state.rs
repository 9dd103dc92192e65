use super::input::InputHistory;
use crate::attack::AttackId;
use crate::state::{MoveInput, Tick};

/// Attack phase derived from animation progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AttackPhase {
    Anticipation,
    Attacking,
    Recovery,
    AtRest,
}

/// Per-agent combo bookkeeping.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboState {
    pub history: InputHistory,
    /// Attack selected last; its clip drives the current phase.
    pub current_attack: Option<AttackId>,
    /// A requested action has not been acknowledged by the server yet.
    pub awaiting_ack: bool,
    /// Animation is blending between two clips.
    pub transitioning: bool,
    pub aiming: bool,
    pub move_input: MoveInput,
    pub reload_until: Option<Tick>,
}

impl ComboState {
    pub fn is_reloading(&self) -> bool {
        self.reload_until.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
