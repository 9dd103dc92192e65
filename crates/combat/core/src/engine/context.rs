//! Per-match combat state and the operations hosts call into.

use std::collections::BTreeMap;

use tracing::{debug, error, info, warn};

use super::events::CombatEvent;
use super::replication::{ReplicatedAgent, ReplicatedFields};
use crate::attack::{AttackDefinition, HitCounter, WeaponId};
use crate::combo::{InputToken, Selection, select_attack};
use crate::config::CombatConfig;
use crate::env::CombatEnv;
use crate::error::{CombatError, GameError};
use crate::hit::{HitOutcome, HitRequest, pipeline};
use crate::state::{AgentId, CombatAgent, Combatant, MoveInput, Tick};
use crate::status::{ConditionalHandle, ConditionalRegistry, StatusPayload};

/// Role of this node in the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Authority {
    /// Resolves hits and owns every timer.
    #[default]
    Server,
    /// Mirrors replicated state; resolution calls are refused.
    Client,
}

/// Everything one match tracks: agents, melee hit counters, conditional
/// status handles, pending events and replication dirty bits.
#[derive(Clone, Debug)]
pub struct MatchContext {
    pub(crate) config: CombatConfig,
    pub(crate) authority: Authority,
    pub(crate) clock: Tick,
    pub(crate) agents: BTreeMap<AgentId, CombatAgent>,
    /// One counter per agent for its current melee attack instance.
    pub(crate) melee_counters: BTreeMap<AgentId, HitCounter>,
    pub(crate) conditionals: ConditionalRegistry,
    pub(crate) events: Vec<CombatEvent>,
    pub(crate) dirty: BTreeMap<AgentId, ReplicatedFields>,
}

impl MatchContext {
    pub fn new(config: CombatConfig, authority: Authority) -> Self {
        Self {
            config,
            authority,
            clock: Tick::ZERO,
            agents: BTreeMap::new(),
            melee_counters: BTreeMap::new(),
            conditionals: ConditionalRegistry::new(),
            events: Vec::new(),
            dirty: BTreeMap::new(),
        }
    }

    pub fn server(config: CombatConfig) -> Self {
        Self::new(config, Authority::Server)
    }

    pub fn client(config: CombatConfig) -> Self {
        Self::new(config, Authority::Client)
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn is_authoritative(&self) -> bool {
        self.authority == Authority::Server
    }

    pub fn now(&self) -> Tick {
        self.clock
    }

    // ========================================================================
    // Agents
    // ========================================================================

    /// Registers an agent and its melee hit counter.
    pub fn spawn(&mut self, agent: CombatAgent) -> Result<(), CombatError> {
        if self.agents.contains_key(&agent.id) {
            return Err(CombatError::DuplicateAgent(agent.id));
        }
        let id = agent.id;
        info!(agent = %id, team = %agent.team, weapon = %agent.weapon, "agent spawned");
        self.melee_counters.insert(id, HitCounter::new(id));
        self.agents.insert(id, agent);
        self.mark_dirty(id, ReplicatedFields::all());
        Ok(())
    }

    pub fn despawn(&mut self, id: AgentId) -> Option<CombatAgent> {
        let agent = self.agents.remove(&id)?;
        self.melee_counters.remove(&id);
        self.conditionals.forget_agent(id);
        self.dirty.remove(&id);
        for other in self.agents.values_mut() {
            if other.grabbed_by == Some(id) {
                other.grabbed_by = None;
            }
            if other.grab_target == Some(id) {
                other.grab_target = None;
            }
        }
        info!(agent = %id, "agent despawned");
        Some(agent)
    }

    pub fn agent(&self, id: AgentId) -> Option<&CombatAgent> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut CombatAgent> {
        self.agents.get_mut(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &CombatAgent> + '_ {
        self.agents.values()
    }

    pub fn melee_counter(&self, id: AgentId) -> Option<&HitCounter> {
        self.melee_counters.get(&id)
    }

    pub(crate) fn require_authority(&self, operation: &'static str) -> Result<(), CombatError> {
        match self.authority {
            Authority::Server => Ok(()),
            Authority::Client => Err(CombatError::NotAuthoritative { operation }),
        }
    }

    pub(crate) fn try_agent_mut(&mut self, id: AgentId) -> Result<&mut CombatAgent, CombatError> {
        self.agents.get_mut(&id).ok_or(CombatError::UnknownAgent(id))
    }

    pub(crate) fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub(crate) fn mark_dirty(&mut self, id: AgentId, fields: ReplicatedFields) {
        if fields.is_empty() {
            return;
        }
        *self.dirty.entry(id).or_default() |= fields;
    }

    // ========================================================================
    // Hit resolution
    // ========================================================================

    /// Resolves a hit using a caller-owned counter (projectiles own theirs).
    ///
    /// Returns `true` when the hit registered against the counter.
    pub fn resolve_hit(
        &mut self,
        env: &CombatEnv<'_>,
        counter: &mut HitCounter,
        request: &HitRequest,
    ) -> bool {
        match pipeline::resolve(self, env, counter, request) {
            Ok(outcome) => outcome.is_registered(),
            Err(error) => {
                self.log_violation("resolve_hit", &error);
                false
            }
        }
    }

    /// Resolves a melee hit against the attacker's own hit counter.
    pub fn resolve_melee_hit(&mut self, env: &CombatEnv<'_>, request: &HitRequest) -> bool {
        match self.try_resolve_melee_hit(env, request) {
            Ok(outcome) => outcome.is_registered(),
            Err(error) => {
                self.log_violation("resolve_melee_hit", &error);
                false
            }
        }
    }

    /// Like [`MatchContext::resolve_melee_hit`], reporting the full outcome.
    pub fn try_resolve_melee_hit(
        &mut self,
        env: &CombatEnv<'_>,
        request: &HitRequest,
    ) -> Result<HitOutcome, CombatError> {
        let mut counter = self
            .melee_counters
            .remove(&request.attacker)
            .ok_or(CombatError::UnknownAgent(request.attacker))?;
        let result = pipeline::resolve(self, env, &mut counter, request);
        self.melee_counters.insert(request.attacker, counter);
        result
    }

    /// Full-outcome variant of [`MatchContext::resolve_hit`].
    pub fn try_resolve_hit(
        &mut self,
        env: &CombatEnv<'_>,
        counter: &mut HitCounter,
        request: &HitRequest,
    ) -> Result<HitOutcome, CombatError> {
        pipeline::resolve(self, env, counter, request)
    }

    // ========================================================================
    // Attack selection
    // ========================================================================

    /// Picks the attack `token` triggers for `id`.
    ///
    /// On success the agent's melee hit counter starts a new attack instance
    /// and a [`CombatEvent::PlayAttack`] is emitted. On a client the agent
    /// then waits for the server to acknowledge the action.
    pub fn get_attack<'a>(
        &mut self,
        env: &CombatEnv<'a>,
        id: AgentId,
        token: InputToken,
    ) -> Option<&'a AttackDefinition> {
        match self.try_get_attack(env, id, token) {
            Ok(attack) => attack,
            Err(error) => {
                self.log_violation("get_attack", &error);
                None
            }
        }
    }

    fn try_get_attack<'a>(
        &mut self,
        env: &CombatEnv<'a>,
        id: AgentId,
        token: InputToken,
    ) -> Result<Option<&'a AttackDefinition>, CombatError> {
        let catalog = env.catalog()?;
        let animation = env.animation()?;
        let now = self.clock;
        let authority = self.authority;
        let config = self.config.clone();

        let agent = self.try_agent_mut(id)?;
        match select_attack(agent, token, catalog, animation, &config, now) {
            Selection::Attack(attack) => {
                if authority == Authority::Client {
                    agent.combo.awaiting_ack = true;
                }
                if let Some(counter) = self.melee_counters.get_mut(&id) {
                    counter.reset(attack.id);
                }
                debug!(agent = %id, attack = %attack.id, token = %token, "attack selected");
                self.emit(CombatEvent::PlayAttack {
                    agent: id,
                    attack: attack.id,
                    token,
                });
                self.mark_dirty(id, ReplicatedFields::STAMINA);
                Ok(Some(attack))
            }
            Selection::ReloadStarted => {
                let until = agent.combo.reload_until.unwrap_or(now);
                debug!(agent = %id, until = %until, "attack needs ammo, reloading");
                self.emit(CombatEvent::ReloadStarted { agent: id, until });
                Ok(None)
            }
            Selection::Unavailable => {
                debug!(agent = %id, token = %token, "no attack available");
                Ok(None)
            }
        }
    }

    /// Server entry point for attack tokens requested by clients.
    pub fn request_attack<'a>(
        &mut self,
        env: &CombatEnv<'a>,
        id: AgentId,
        token: InputToken,
    ) -> Option<&'a AttackDefinition> {
        if let Err(error) = self.require_authority("request_attack") {
            self.log_violation("request_attack", &error);
            return None;
        }
        self.get_attack(env, id, token)
    }

    /// Clears the client-side wait after the server acknowledged an action.
    pub fn acknowledge_action(&mut self, id: AgentId) -> bool {
        match self.agents.get_mut(&id) {
            Some(agent) => {
                agent.combo.awaiting_ack = false;
                true
            }
            None => {
                self.log_violation("acknowledge_action", &CombatError::UnknownAgent(id));
                false
            }
        }
    }

    // ========================================================================
    // Statuses
    // ========================================================================

    /// Queues a timed status. `false` if blacklisted or suppressed by immunity.
    pub fn try_add_status(&mut self, id: AgentId, payload: StatusPayload) -> bool {
        match self.add_status(id, payload) {
            Ok(accepted) => accepted,
            Err(error) => {
                self.log_violation("try_add_status", &error);
                false
            }
        }
    }

    pub(crate) fn add_status(
        &mut self,
        id: AgentId,
        payload: StatusPayload,
    ) -> Result<bool, CombatError> {
        self.require_authority("try_add_status")?;
        let config = &self.config;
        let agent = self.agents.get_mut(&id).ok_or(CombatError::UnknownAgent(id))?;
        let kind = payload.kind;
        let Some(handle) = agent.statuses.try_add(payload, config) else {
            debug!(agent = %id, %kind, "status rejected");
            return Ok(false);
        };
        self.emit(CombatEvent::StatusApplied {
            agent: id,
            handle,
            kind,
        });
        Ok(true)
    }

    /// Queues a status that lasts until removed (or `max_duration_millis`).
    pub fn add_conditional_status(
        &mut self,
        id: AgentId,
        payload: StatusPayload,
        max_duration_millis: Option<u32>,
    ) -> Option<ConditionalHandle> {
        let result = self.require_authority("add_conditional_status").and_then(|()| {
            let config = &self.config;
            let agent = self.agents.get_mut(&id).ok_or(CombatError::UnknownAgent(id))?;
            let kind = payload.kind;
            Ok(agent
                .statuses
                .add_conditional(payload, max_duration_millis, config)
                .map(|handle| (handle, kind)))
        });
        match result {
            Ok(Some((handle, kind))) => {
                self.emit(CombatEvent::StatusApplied {
                    agent: id,
                    handle,
                    kind,
                });
                Some(self.conditionals.register(id, handle))
            }
            Ok(None) => None,
            Err(error) => {
                self.log_violation("add_conditional_status", &error);
                None
            }
        }
    }

    /// Requests cancellation; the status reverses on the next step.
    pub fn remove_conditional_status(&mut self, handle: ConditionalHandle) -> bool {
        let result = self.require_authority("remove_conditional_status").and_then(|()| {
            let (agent, status) = self
                .conditionals
                .take(handle)
                .ok_or(CombatError::UnknownConditionalHandle(handle))?;
            let agent = self.try_agent_mut(agent)?;
            Ok(agent.statuses.request_cancel(status))
        });
        result.unwrap_or_else(|error| {
            self.log_violation("remove_conditional_status", &error);
            false
        })
    }

    pub fn cancel_all_statuses(&mut self, id: AgentId) -> bool {
        match self.try_agent_mut(id) {
            Ok(agent) => {
                agent.statuses.cancel_all();
                true
            }
            Err(error) => {
                self.log_violation("cancel_all_statuses", &error);
                false
            }
        }
    }

    /// Equips another weapon, cancelling statuses tied to the old one.
    pub fn switch_weapon(&mut self, id: AgentId, weapon: WeaponId) -> bool {
        let Ok(agent) = self.try_agent_mut(id) else {
            self.log_violation("switch_weapon", &CombatError::UnknownAgent(id));
            return false;
        };
        agent.weapon = weapon;
        agent.statuses.cancel_weapon_bound();
        agent.combo.history.clear();
        agent.combo.current_attack = None;
        agent.charge_millis = 0;
        debug!(agent = %id, weapon = %weapon, "weapon switched");
        true
    }

    // ========================================================================
    // Host input
    // ========================================================================

    pub fn set_blocking(&mut self, id: AgentId, blocking: bool) -> bool {
        self.with_agent("set_blocking", id, |agent| agent.blocking = blocking)
    }

    pub fn set_move_input(&mut self, id: AgentId, input: MoveInput) -> bool {
        self.with_agent("set_move_input", id, |agent| agent.combo.move_input = input)
    }

    pub fn set_aiming(&mut self, id: AgentId, aiming: bool) -> bool {
        self.with_agent("set_aiming", id, |agent| agent.combo.aiming = aiming)
    }

    pub fn set_transitioning(&mut self, id: AgentId, transitioning: bool) -> bool {
        self.with_agent("set_transitioning", id, |agent| {
            agent.combo.transitioning = transitioning;
        })
    }

    /// Records how long the current heavy attack has been held.
    pub fn set_charge(&mut self, id: AgentId, charge_millis: u32) -> bool {
        self.with_agent("set_charge", id, |agent| agent.charge_millis = charge_millis)
    }

    fn with_agent(
        &mut self,
        operation: &'static str,
        id: AgentId,
        apply: impl FnOnce(&mut CombatAgent),
    ) -> bool {
        match self.agents.get_mut(&id) {
            Some(agent) => {
                apply(agent);
                true
            }
            None => {
                self.log_violation(operation, &CombatError::UnknownAgent(id));
                false
            }
        }
    }

    /// Spends a full rage meter to start raging.
    pub fn activate_rage(&mut self, id: AgentId) -> bool {
        let now = self.clock;
        let ticks = self.config.ticks(self.config.rage_duration_millis);
        let Ok(agent) = self.try_agent_mut(id) else {
            self.log_violation("activate_rage", &CombatError::UnknownAgent(id));
            return false;
        };
        if agent.is_dead() || agent.is_raging(now) || !agent.vitals.rage.is_full() {
            return false;
        }
        agent.raging_until = Some(now + ticks);
        info!(agent = %id, until = %(now + ticks), "rage activated");
        true
    }

    /// Grants HP above the maximum. Ignored for dead agents.
    pub fn grant_overheal(&mut self, id: AgentId, amount: f32) -> bool {
        let Ok(agent) = self.try_agent_mut(id) else {
            self.log_violation("grant_overheal", &CombatError::UnknownAgent(id));
            return false;
        };
        if agent.is_dead() {
            return false;
        }
        agent.vitals.hp.grant_overheal(amount);
        self.mark_dirty(id, ReplicatedFields::HP);
        true
    }

    /// Restores spawn state, reversing every status immediately.
    pub fn respawn(&mut self, id: AgentId) -> bool {
        let Ok(agent) = self.try_agent_mut(id) else {
            self.log_violation("respawn", &CombatError::UnknownAgent(id));
            return false;
        };
        agent.respawn();
        self.conditionals.forget_agent(id);
        if let Some(counter) = self.melee_counters.get_mut(&id) {
            *counter = HitCounter::new(id);
        }
        for other in self.agents.values_mut() {
            if other.grabbed_by == Some(id) {
                other.grabbed_by = None;
            }
            if other.grab_target == Some(id) {
                other.grab_target = None;
            }
        }
        info!(agent = %id, "agent respawned");
        self.emit(CombatEvent::Respawned { agent: id });
        self.mark_dirty(id, ReplicatedFields::all());
        true
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshots every dirty agent and clears the dirty set.
    pub fn drain_replication(&mut self) -> Vec<ReplicatedAgent> {
        let dirty = std::mem::take(&mut self.dirty);
        dirty
            .into_iter()
            .filter_map(|(id, fields)| {
                self.agents
                    .get(&id)
                    .map(|agent| ReplicatedAgent::capture(agent, fields))
            })
            .collect()
    }

    /// Mirrors server snapshots on a client. Returns how many were applied.
    pub fn apply_replicated(&mut self, snapshots: &[ReplicatedAgent]) -> usize {
        if self.is_authoritative() {
            warn!("replicated snapshots ignored on the authoritative node");
            return 0;
        }
        let mut applied = 0;
        for snapshot in snapshots {
            if let Some(agent) = self.agents.get_mut(&snapshot.id) {
                snapshot.apply_to(agent);
                applied += 1;
            }
        }
        applied
    }

    /// Logs an invariant violation at a level matching its severity.
    pub(crate) fn log_violation(&self, operation: &'static str, error: &CombatError) {
        let context = error.context(self.clock, operation);
        let severity = error.severity();
        if severity.is_internal() {
            error!(
                operation = context.message.unwrap_or(operation),
                agent = ?context.agent,
                tick = %context.tick,
                severity = severity.as_str(),
                code = error.error_code(),
                %error,
                "combat invariant violated"
            );
        } else {
            warn!(
                operation = context.message.unwrap_or(operation),
                agent = ?context.agent,
                tick = %context.tick,
                severity = severity.as_str(),
                code = error.error_code(),
                %error,
                "combat call refused"
            );
        }
    }
}

