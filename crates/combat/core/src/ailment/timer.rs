use super::kind::{AilmentKind, ResetPolicy};
use crate::config::CombatConfig;
use crate::env::{AnimationPlayer, ClipId};
use crate::state::{AgentId, Tick};

/// Reset condition of the agent's current ailment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AilmentTimer {
    Fixed { expires_at: Tick },
    /// Knockup airtime plus the juggle hits taken so far.
    Juggle { lands_at: Tick, hits: u8 },
    /// Runs while the reaction clip plays; never ends on the tick it started.
    Animation { started_at: Tick },
}

/// Why an ailment ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AilmentExpiry {
    Elapsed,
    Landed,
    ClipFinished,
}

impl AilmentTimer {
    /// Timer for a freshly entered ailment, or `None` if nothing resets it.
    pub fn start(kind: AilmentKind, now: Tick, config: &CombatConfig) -> Option<Self> {
        match kind.reset_policy() {
            ResetPolicy::Never | ResetPolicy::Terminal => None,
            ResetPolicy::FixedTimer => {
                let millis = match kind {
                    AilmentKind::Knockdown => config.knockdown_millis,
                    _ => config.stun_millis,
                };
                Some(Self::Fixed {
                    expires_at: now + config.ticks(millis),
                })
            }
            ResetPolicy::HitCountLimited => Some(Self::Juggle {
                lands_at: now + config.ticks(config.knockup_millis),
                hits: 0,
            }),
            ResetPolicy::AnimationBound => Some(Self::Animation { started_at: now }),
        }
    }

    /// Restarts a knockup's airtime, optionally keeping its juggle count.
    pub fn relaunch(
        previous: Option<Self>,
        keep_hits: bool,
        now: Tick,
        config: &CombatConfig,
    ) -> Self {
        let hits = match previous {
            Some(Self::Juggle { hits, .. }) if keep_hits => hits,
            _ => 0,
        };
        Self::Juggle {
            lands_at: now + config.ticks(config.knockup_millis),
            hits,
        }
    }

    /// Counts a hit on a juggled agent. Returns `true` once the ceiling is reached.
    pub fn register_juggle_hit(&mut self, ceiling: u8) -> bool {
        match self {
            Self::Juggle { hits, .. } => {
                *hits = hits.saturating_add(1);
                *hits >= ceiling
            }
            _ => false,
        }
    }

    pub fn juggle_hits(&self) -> u8 {
        match self {
            Self::Juggle { hits, .. } => *hits,
            _ => 0,
        }
    }

    /// Checks whether `kind` has run its course for `agent` at `now`.
    pub fn poll<A>(
        &self,
        kind: AilmentKind,
        agent: AgentId,
        now: Tick,
        animation: &A,
    ) -> Option<AilmentExpiry>
    where
        A: AnimationPlayer + ?Sized,
    {
        match *self {
            Self::Fixed { expires_at } => (now >= expires_at).then_some(AilmentExpiry::Elapsed),
            Self::Juggle { lands_at, .. } => (now >= lands_at).then_some(AilmentExpiry::Landed),
            Self::Animation { started_at } => {
                let finished = now > started_at
                    && !animation.is_playing_clip(agent, ClipId::Reaction(kind));
                finished.then_some(AilmentExpiry::ClipFinished)
            }
        }
    }
}
