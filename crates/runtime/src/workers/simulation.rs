//! Simulation worker that owns the authoritative [`combat_core::MatchContext`].
//!
//! Receives commands from [`crate::RuntimeHandle`], runs them through the
//! combat rules, and publishes the resulting feedback and replication
//! events to the EventBus.

use std::collections::BTreeMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use combat_core::{
    AgentId, AttackId, CombatAgent, HitCounter, HitOutcome, HitRequest, InputToken,
    MatchContext, ReplicatedAgent, StatusPayload, Tick,
};

use crate::api::{AgentInput, ProjectileId, Result, RuntimeError};
use crate::events::{Event, EventBus, FeedbackEvent, ReplicationEvent};
use crate::oracle::OracleBundle;

/// Commands that can be sent to the simulation worker
pub enum Command {
    Spawn {
        agent: Box<CombatAgent>,
        reply: oneshot::Sender<Result<()>>,
    },
    Despawn {
        agent: AgentId,
        reply: oneshot::Sender<Option<CombatAgent>>,
    },
    /// Advance one fixed step.
    Step { reply: oneshot::Sender<Result<Tick>> },
    RequestAttack {
        agent: AgentId,
        token: InputToken,
        reply: oneshot::Sender<Option<AttackId>>,
    },
    ResolveMeleeHit {
        request: HitRequest,
        reply: oneshot::Sender<Result<HitOutcome>>,
    },
    ResolveProjectileHit {
        projectile: ProjectileId,
        request: HitRequest,
        reply: oneshot::Sender<Result<HitOutcome>>,
    },
    ReleaseProjectile {
        projectile: ProjectileId,
        reply: oneshot::Sender<bool>,
    },
    Input {
        agent: AgentId,
        input: AgentInput,
        reply: oneshot::Sender<bool>,
    },
    AddStatus {
        agent: AgentId,
        payload: StatusPayload,
        reply: oneshot::Sender<bool>,
    },
    Respawn {
        agent: AgentId,
        reply: oneshot::Sender<bool>,
    },
    ApplyReplicated {
        snapshots: Vec<ReplicatedAgent>,
        reply: oneshot::Sender<usize>,
    },
    /// Query one agent's current state (read-only).
    QueryAgent {
        agent: AgentId,
        reply: oneshot::Sender<Option<CombatAgent>>,
    },
    QueryTick { reply: oneshot::Sender<Tick> },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Spawn { .. } => "spawn",
            Command::Despawn { .. } => "despawn",
            Command::Step { .. } => "step",
            Command::RequestAttack { .. } => "request_attack",
            Command::ResolveMeleeHit { .. } => "resolve_melee_hit",
            Command::ResolveProjectileHit { .. } => "resolve_projectile_hit",
            Command::ReleaseProjectile { .. } => "release_projectile",
            Command::Input { .. } => "input",
            Command::AddStatus { .. } => "add_status",
            Command::Respawn { .. } => "respawn",
            Command::ApplyReplicated { .. } => "apply_replicated",
            Command::QueryAgent { .. } => "query_agent",
            Command::QueryTick { .. } => "query_tick",
        }
    }
}

/// Background task that processes combat commands.
///
/// Commands run one at a time against a single [`MatchContext`], so every
/// combat operation observes a consistent match.
pub struct SimulationWorker {
    context: MatchContext,
    oracles: OracleBundle,
    projectiles: BTreeMap<ProjectileId, HitCounter>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        context: MatchContext,
        oracles: OracleBundle,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            authority = %context.authority(),
            agents = context.agents().count(),
            ruleset = %oracles.rules(),
            "SimulationWorker initialized"
        );

        Self {
            context,
            oracles,
            projectiles: BTreeMap::new(),
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every command sender is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            let name = cmd.name();
            self.handle_command(cmd);
            debug!(target: "runtime::worker", command = name, tick = %self.context.now(), "command handled");
        }
        info!(tick = %self.context.now(), "SimulationWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        let env = self.oracles.as_combat_env();
        let context = &mut self.context;

        match cmd {
            Command::Spawn { agent, reply } => {
                let result = context.spawn(*agent).map_err(RuntimeError::from);
                self.respond(reply, result, "Spawn");
            }
            Command::Despawn { agent, reply } => {
                let despawned = context.despawn(agent);
                self.projectiles.retain(|_, counter| counter.owner() != agent);
                self.respond(reply, despawned, "Despawn");
            }
            Command::Step { reply } => {
                let result = context
                    .try_step(&env)
                    .map(|()| context.now())
                    .map_err(RuntimeError::from);
                self.respond(reply, result, "Step");
            }
            Command::RequestAttack {
                agent,
                token,
                reply,
            } => {
                // Clients predict locally; the server validates the request.
                let attack = if context.is_authoritative() {
                    context.request_attack(&env, agent, token)
                } else {
                    context.get_attack(&env, agent, token)
                };
                self.respond(reply, attack.map(|attack| attack.id), "RequestAttack");
            }
            Command::ResolveMeleeHit { request, reply } => {
                let result = context
                    .try_resolve_melee_hit(&env, &request)
                    .map_err(RuntimeError::from);
                self.respond(reply, result, "ResolveMeleeHit");
            }
            Command::ResolveProjectileHit {
                projectile,
                request,
                reply,
            } => {
                let counter = self
                    .projectiles
                    .entry(projectile)
                    .or_insert_with(|| HitCounter::for_attack(request.attacker, request.attack));
                let result = context
                    .try_resolve_hit(&env, counter, &request)
                    .map_err(RuntimeError::from);
                self.respond(reply, result, "ResolveProjectileHit");
            }
            Command::ReleaseProjectile { projectile, reply } => {
                let released = self.projectiles.remove(&projectile).is_some();
                self.respond(reply, released, "ReleaseProjectile");
            }
            Command::Input {
                agent,
                input,
                reply,
            } => {
                let accepted = match input {
                    AgentInput::Blocking(blocking) => context.set_blocking(agent, blocking),
                    AgentInput::Move(movement) => context.set_move_input(agent, movement),
                    AgentInput::Aiming(aiming) => context.set_aiming(agent, aiming),
                    AgentInput::Transitioning(transitioning) => {
                        context.set_transitioning(agent, transitioning)
                    }
                    AgentInput::Charge(millis) => context.set_charge(agent, millis),
                    AgentInput::SwitchWeapon(weapon) => context.switch_weapon(agent, weapon),
                    AgentInput::ActivateRage => context.activate_rage(agent),
                    AgentInput::Acknowledge => context.acknowledge_action(agent),
                };
                self.respond(reply, accepted, "Input");
            }
            Command::AddStatus {
                agent,
                payload,
                reply,
            } => {
                let accepted = context.try_add_status(agent, payload);
                self.respond(reply, accepted, "AddStatus");
            }
            Command::Respawn { agent, reply } => {
                let respawned = context.respawn(agent);
                self.respond(reply, respawned, "Respawn");
            }
            Command::ApplyReplicated { snapshots, reply } => {
                let applied = context.apply_replicated(&snapshots);
                self.respond(reply, applied, "ApplyReplicated");
            }
            Command::QueryAgent { agent, reply } => {
                let agent = context.agent(agent).cloned();
                self.respond(reply, agent, "QueryAgent");
            }
            Command::QueryTick { reply } => {
                let tick = context.now();
                self.respond(reply, tick, "QueryTick");
            }
        }
    }

    /// Publishes what the command produced, then replies, so callers that
    /// awaited the reply find its events already on the bus.
    fn respond<T>(&mut self, reply: oneshot::Sender<T>, value: T, command: &'static str) {
        self.publish();
        if reply.send(value).is_err() {
            debug!("{} reply channel closed (caller dropped)", command);
        }
    }

    /// Publishes everything the last command produced.
    fn publish(&mut self) {
        let tick = self.context.now();

        for event in self.context.drain_events() {
            self.event_bus
                .publish(Event::Feedback(FeedbackEvent { tick, event }));
        }

        let agents = self.context.drain_replication();
        if !agents.is_empty() {
            self.event_bus
                .publish(Event::Replication(ReplicationEvent { tick, agents }));
        }
    }
}
