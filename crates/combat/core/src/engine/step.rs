//! Fixed-step advance of every agent's timers.

use tracing::{debug, info};

use super::context::MatchContext;
use super::events::CombatEvent;
use super::replication::ReplicatedFields;
use crate::ailment::{AilmentExpiry, AilmentKind};
use crate::combo::{auto_reload, finish_reload};
use crate::config::CombatConfig;
use crate::env::{AnimationPlayer, CombatEnv};
use crate::error::CombatError;
use crate::hit::pipeline::release_grab_links;
use crate::state::{AgentId, CombatAgent, Combatant, Tick};
use crate::status::{StatusHandle, StatusKind};

/// What advancing one agent produced, applied to the match afterwards.
#[derive(Default)]
struct AgentStep {
    events: Vec<CombatEvent>,
    dirty: ReplicatedFields,
    expired: Vec<StatusHandle>,
    killed: bool,
    grab_released: bool,
}

impl MatchContext {
    /// Advances the clock by one step. Returns `false` if the step was refused.
    pub fn step(&mut self, env: &CombatEnv<'_>) -> bool {
        match self.try_step(env) {
            Ok(()) => true,
            Err(error) => {
                self.log_violation("step", &error);
                false
            }
        }
    }

    pub fn try_step(&mut self, env: &CombatEnv<'_>) -> Result<(), CombatError> {
        self.require_authority("step")?;
        let animation = env.animation()?;

        self.clock += 1;
        let now = self.clock;
        let ids: Vec<AgentId> = self.agents.keys().copied().collect();

        for id in ids {
            let Some(agent) = self.agents.get_mut(&id) else {
                continue;
            };
            let step = advance_agent(agent, &self.config, now, animation);
            let held = agent.grab_target;

            for &handle in &step.expired {
                self.conditionals.forget_status(id, handle);
            }
            if step.killed {
                release_grab_links(self, id, held);
            } else if step.grab_released {
                release_grab_links(self, id, None);
            }
            if step.killed
                && let Some(agent) = self.agents.get_mut(&id)
            {
                agent.grab_target = None;
                agent.grabbed_by = None;
            }
            self.events.extend(step.events);
            self.mark_dirty(id, step.dirty);
        }

        self.repair_grab_links();
        Ok(())
    }

    /// Drops links whose other side no longer agrees.
    fn repair_grab_links(&mut self) {
        let broken: Vec<AgentId> = self
            .agents
            .values()
            .filter(|agent| {
                agent.grab_target.is_some_and(|target| {
                    self.agents
                        .get(&target)
                        .is_none_or(|target| target.grabbed_by != Some(agent.id))
                })
            })
            .map(|agent| agent.id)
            .collect();
        for id in broken {
            if let Some(agent) = self.agents.get_mut(&id) {
                debug!(agent = %id, "stale grab link cleared");
                agent.grab_target = None;
            }
        }
    }
}

fn advance_agent<A>(
    agent: &mut CombatAgent,
    config: &CombatConfig,
    now: Tick,
    animation: &A,
) -> AgentStep
where
    A: AnimationPlayer + ?Sized,
{
    let mut step = AgentStep::default();
    let id = agent.id;

    // ===== statuses =====
    let before: Vec<StatusKind> = agent.statuses.active_kinds().collect();
    let tick = agent.statuses.advance(config, &mut agent.vitals);
    for &(handle, kind) in &tick.expired {
        step.expired.push(handle);
        step.events.push(CombatEvent::StatusExpired {
            agent: id,
            handle,
            kind,
        });
    }
    if agent.statuses.active_kinds().ne(before) {
        step.dirty |= ReplicatedFields::STATUSES;
    }
    if tick.health_delta != 0.0 {
        step.dirty |= ReplicatedFields::HP;
    }

    if !agent.is_dead() && tick.health_delta < 0.0 && agent.vitals.hp.is_empty() {
        let previous = agent.enter_ailment(AilmentKind::Death, now, config);
        agent.killed_by = tick.damage_source;
        agent.statuses.cancel_all();
        agent.raging_until = None;
        agent.combo.reset();
        info!(agent = %id, killer = ?tick.damage_source, "killed by status damage");
        step.events.push(CombatEvent::AilmentChanged {
            agent: id,
            from: previous,
            to: AilmentKind::Death,
        });
        step.events.push(CombatEvent::Killed {
            victim: id,
            killer: tick.damage_source,
        });
        step.dirty |= ReplicatedFields::AILMENT | ReplicatedFields::RAGE;
        step.killed = true;
        return step;
    }

    // ===== ailment reset =====
    let expiry = agent
        .ailment_timer
        .and_then(|timer| timer.poll(agent.ailment, id, now, animation));
    if let Some(expiry) = expiry {
        let previous = agent.clear_ailment();
        if previous == AilmentKind::Knockdown && expiry == AilmentExpiry::Elapsed {
            agent.grant_invincibility(now, config.ticks(config.knockdown_invincibility_millis));
        }
        if previous == AilmentKind::Grab {
            agent.grabbed_by = None;
            step.grab_released = true;
        }
        debug!(agent = %id, ailment = %previous, ?expiry, "ailment ended");
        step.events.push(CombatEvent::AilmentChanged {
            agent: id,
            from: previous,
            to: AilmentKind::None,
        });
        step.dirty |= ReplicatedFields::AILMENT;
    }

    // ===== hit-stop, stagger marker =====
    if agent.should_shake && !agent.is_in_hit_stop(now) {
        agent.should_shake = false;
    }
    if agent.staggered_at.is_some_and(|at| at < now) {
        agent.staggered_at = None;
    }

    // ===== rage =====
    if let Some(until) = agent.raging_until {
        if now >= until {
            agent.raging_until = None;
            agent.vitals.rage.current = 0.0;
            debug!(agent = %id, "rage ended");
        } else {
            let ticks = config.ticks(config.rage_duration_millis).max(1);
            agent.vitals.rage.drain(agent.vitals.rage.maximum / ticks as f32);
        }
        step.dirty |= ReplicatedFields::RAGE;
    }

    // ===== stamina =====
    if !agent.blocking && !agent.is_dead() {
        let amount = config.stamina_regen_per_second * config.step_seconds();
        if agent.vitals.stamina.restore(amount) > 0.0 {
            step.dirty |= ReplicatedFields::STAMINA;
        }
    }

    // ===== reload =====
    if finish_reload(agent, now) {
        step.events.push(CombatEvent::ReloadFinished { agent: id });
    }
    if auto_reload(agent, now, config)
        && let Some(until) = agent.combo.reload_until
    {
        step.events.push(CombatEvent::ReloadStarted { agent: id, until });
    }

    step
}
