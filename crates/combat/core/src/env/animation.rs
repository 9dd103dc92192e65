use crate::ailment::AilmentKind;
use crate::attack::AttackId;
use crate::state::AgentId;

/// Animation clip the combat rules care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipId {
    Attack(AttackId),
    /// Hit reaction played while an ailment is active.
    Reaction(AilmentKind),
    /// Flinch played when a blocked hit is fully absorbed.
    BlockReaction,
}

/// Per-agent animation state, owned by the host's animation system.
///
/// Attack phases and animation-bound ailments are derived from this instead
/// of being stored.
pub trait AnimationPlayer: Send + Sync {
    /// No attack or reaction clip is playing.
    fn is_at_rest(&self, agent: AgentId) -> bool;

    fn is_playing_clip(&self, agent: AgentId, clip: ClipId) -> bool;

    /// Normalized playback time in `[0, 1]`, or `None` if `clip` is not playing.
    fn normalized_time(&self, agent: AgentId, clip: ClipId) -> Option<f32>;
}
