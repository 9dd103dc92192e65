//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the simulation, submitting hits and inputs, or streaming events
//! from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{
    AgentId, AttackId, CombatAgent, HitOutcome, HitRequest, InputToken, ReplicatedAgent,
    StatusPayload, Tick,
};

use super::errors::{Result, RuntimeError};
use super::input::{AgentInput, ProjectileId};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Register an agent with the match.
    pub async fn spawn_agent(&self, agent: CombatAgent) -> Result<()> {
        self.request(|reply| Command::Spawn {
            agent: Box::new(agent),
            reply,
        })
        .await?
    }

    /// Remove an agent; returns its final state if it existed.
    pub async fn despawn_agent(&self, agent: AgentId) -> Result<Option<CombatAgent>> {
        self.request(|reply| Command::Despawn { agent, reply }).await
    }

    /// Advance the simulation by one fixed step.
    pub async fn step(&self) -> Result<Tick> {
        self.request(|reply| Command::Step { reply }).await?
    }

    /// Resolve an attack input. `None` when no attack is available.
    pub async fn request_attack(
        &self,
        agent: AgentId,
        token: InputToken,
    ) -> Result<Option<AttackId>> {
        self.request(|reply| Command::RequestAttack {
            agent,
            token,
            reply,
        })
        .await
    }

    /// Resolve a melee collision against the attacker's own hit counter.
    pub async fn resolve_melee_hit(&self, request: HitRequest) -> Result<HitOutcome> {
        self.request(|reply| Command::ResolveMeleeHit { request, reply })
            .await?
    }

    /// Resolve a projectile collision against the projectile's hit counter.
    ///
    /// The counter is created on the projectile's first hit and lives until
    /// [`RuntimeHandle::release_projectile`].
    pub async fn resolve_projectile_hit(
        &self,
        projectile: ProjectileId,
        request: HitRequest,
    ) -> Result<HitOutcome> {
        self.request(|reply| Command::ResolveProjectileHit {
            projectile,
            request,
            reply,
        })
        .await?
    }

    pub async fn release_projectile(&self, projectile: ProjectileId) -> Result<bool> {
        self.request(|reply| Command::ReleaseProjectile { projectile, reply })
            .await
    }

    /// Forward one host input. `false` if the agent is unknown or the input was refused.
    pub async fn send_input(&self, agent: AgentId, input: AgentInput) -> Result<bool> {
        self.request(|reply| Command::Input {
            agent,
            input,
            reply,
        })
        .await
    }

    pub async fn add_status(&self, agent: AgentId, payload: StatusPayload) -> Result<bool> {
        self.request(|reply| Command::AddStatus {
            agent,
            payload,
            reply,
        })
        .await
    }

    pub async fn respawn(&self, agent: AgentId) -> Result<bool> {
        self.request(|reply| Command::Respawn { agent, reply }).await
    }

    /// Mirror server snapshots (client runtimes only). Returns how many applied.
    pub async fn apply_replicated(&self, snapshots: Vec<ReplicatedAgent>) -> Result<usize> {
        self.request(|reply| Command::ApplyReplicated { snapshots, reply })
            .await
    }

    /// Query one agent's current state (read-only snapshot)
    pub async fn query_agent(&self, agent: AgentId) -> Result<Option<CombatAgent>> {
        self.request(|reply| Command::QueryAgent { agent, reply }).await
    }

    pub async fn query_tick(&self) -> Result<Tick> {
        self.request(|reply| Command::QueryTick { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Replication` - Dirty-field snapshots for clients
    /// - `Topic::Feedback` - Combat events for presentation
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
