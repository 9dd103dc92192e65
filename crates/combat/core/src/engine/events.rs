//! Events the match emits for presentation and networking collaborators.

use crate::ailment::AilmentKind;
use crate::attack::AttackId;
use crate::combo::InputToken;
use crate::env::ClipId;
use crate::hit::{HitDelivery, MitigationTier};
use crate::state::{AgentId, Point, Tick};
use crate::status::{StatusHandle, StatusKind};

/// Fire-and-forget feedback produced while resolving combat.
///
/// Events are appended in the order they happen and drained by the host
/// with [`crate::MatchContext::drain_events`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    Hit {
        attacker: AgentId,
        victim: AgentId,
        attack: AttackId,
        delivery: HitDelivery,
        tier: MitigationTier,
        hp_delta: f32,
        impact_point: Point,
        source_point: Point,
    },
    /// Defense absorbed the whole hit.
    Blocked {
        attacker: AgentId,
        victim: AgentId,
        impact_point: Point,
    },
    AilmentChanged {
        agent: AgentId,
        from: AilmentKind,
        to: AilmentKind,
    },
    Killed {
        victim: AgentId,
        killer: Option<AgentId>,
    },
    StatusApplied {
        agent: AgentId,
        handle: StatusHandle,
        kind: StatusKind,
    },
    StatusExpired {
        agent: AgentId,
        handle: StatusHandle,
        kind: StatusKind,
    },
    /// Request for the animation collaborator to start a clip.
    PlayClip { agent: AgentId, clip: ClipId },
    /// A selected attack should start playing.
    PlayAttack {
        agent: AgentId,
        attack: AttackId,
        token: InputToken,
    },
    ReloadStarted { agent: AgentId, until: Tick },
    ReloadFinished { agent: AgentId },
    Respawned { agent: AgentId },
}

impl CombatEvent {
    /// Agent the event is primarily about.
    pub fn subject(&self) -> AgentId {
        match self {
            Self::Hit { victim, .. }
            | Self::Blocked { victim, .. }
            | Self::Killed { victim, .. } => *victim,
            Self::AilmentChanged { agent, .. }
            | Self::StatusApplied { agent, .. }
            | Self::StatusExpired { agent, .. }
            | Self::PlayClip { agent, .. }
            | Self::PlayAttack { agent, .. }
            | Self::ReloadStarted { agent, .. }
            | Self::ReloadFinished { agent }
            | Self::Respawned { agent } => *agent,
        }
    }
}
