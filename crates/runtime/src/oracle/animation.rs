//! Animation oracle fed by the host's animation system.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use combat_core::{AgentId, AnimationPlayer, ClipId};

#[derive(Clone, Copy, Debug)]
struct PlayingClip {
    clip: ClipId,
    normalized_time: f32,
}

/// Last reported clip per agent.
///
/// Agents without an entry are at rest.
#[derive(Debug, Default)]
pub struct AnimationMirror {
    clips: RwLock<HashMap<AgentId, PlayingClip>>,
}

impl AnimationMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `clip` is playing at `normalized_time` (clamped to `[0, 1]`).
    pub fn report(&self, agent: AgentId, clip: ClipId, normalized_time: f32) {
        let playing = PlayingClip {
            clip,
            normalized_time: normalized_time.clamp(0.0, 1.0),
        };
        self.clips
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(agent, playing);
    }

    /// Records that the agent's clip finished.
    pub fn rest(&self, agent: AgentId) {
        self.clips
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&agent);
    }

    fn playing(&self, agent: AgentId) -> Option<PlayingClip> {
        self.clips
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&agent)
            .copied()
    }
}

impl AnimationPlayer for AnimationMirror {
    fn is_at_rest(&self, agent: AgentId) -> bool {
        self.playing(agent).is_none()
    }

    fn is_playing_clip(&self, agent: AgentId, clip: ClipId) -> bool {
        self.playing(agent).is_some_and(|playing| playing.clip == clip)
    }

    fn normalized_time(&self, agent: AgentId, clip: ClipId) -> Option<f32> {
        self.playing(agent)
            .filter(|playing| playing.clip == clip)
            .map(|playing| playing.normalized_time)
    }
}

#[cfg(test)]
mod tests {
    use combat_core::{AilmentKind, AttackId};

    use super::*;

    #[test]
    fn reports_replace_previous_clip() {
        let mirror = AnimationMirror::new();
        let agent = AgentId(1);
        assert!(mirror.is_at_rest(agent));

        mirror.report(agent, ClipId::Attack(AttackId(3)), 0.4);
        assert_eq!(mirror.normalized_time(agent, ClipId::Attack(AttackId(3))), Some(0.4));

        mirror.report(agent, ClipId::Reaction(AilmentKind::Stagger), 1.7);
        assert!(!mirror.is_playing_clip(agent, ClipId::Attack(AttackId(3))));
        assert_eq!(
            mirror.normalized_time(agent, ClipId::Reaction(AilmentKind::Stagger)),
            Some(1.0)
        );

        mirror.rest(agent);
        assert!(mirror.is_at_rest(agent));
    }
}
