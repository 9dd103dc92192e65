//! Per-agent status timers.
//!
//! Timers only change state inside [`StatusEffects::advance`]. Cancellation is
//! cooperative: requests are recorded and observed on the next advance, where
//! every cancelled timer runs the same reversal as natural expiry.

use std::collections::{BTreeMap, BTreeSet};

use super::kind::{Channel, EffectClass, PeriodicTarget, StatusKind};
use super::payload::StatusPayload;
use super::stack::{ChannelSnapshot, Channels, Multipliers};
use crate::config::CombatConfig;
use crate::state::{AgentId, Hittable};

/// Identifies one status timer on one agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusHandle(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Pending { remaining: u64 },
    /// `None` runs until cancelled.
    Active { remaining: Option<u64> },
}

#[derive(Clone, Debug, PartialEq)]
struct StatusTimer {
    handle: StatusHandle,
    payload: StatusPayload,
    stage: Stage,
    duration: Option<u64>,
    cancel_requested: bool,
    /// Recorded for a negative-immune agent: runs zero ticks, applies nothing.
    suppressed: bool,
}

impl StatusTimer {
    fn is_active(&self) -> bool {
        matches!(self.stage, Stage::Active { .. })
    }
}

/// Result of one [`StatusEffects::advance`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusTick {
    pub expired: Vec<(StatusHandle, StatusKind)>,
    /// Signed HP change applied by periodic effects.
    pub health_delta: f32,
    /// Agent credited with the most recent periodic damage.
    pub damage_source: Option<AgentId>,
}

/// Status effects carried by a single agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusEffects {
    timers: Vec<StatusTimer>,
    next_handle: u32,
    multipliers: Multipliers,
    channels: Channels,
    active: BTreeMap<StatusKind, u16>,
    blacklist: BTreeSet<StatusKind>,
    negative_immune: bool,
    /// Timers with a handle below this watermark are cancelled on the next advance.
    cancel_all_below: Option<StatusHandle>,
    cancel_weapon_below: Option<StatusHandle>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a timed status. Returns `None` if the kind is blacklisted or
    /// the agent is immune to it (an immune status is still recorded, with
    /// zero duration, so its expiry is observable).
    pub fn try_add(
        &mut self,
        payload: StatusPayload,
        config: &CombatConfig,
    ) -> Option<StatusHandle> {
        let duration = config.ticks(payload.duration_millis);
        self.insert(payload, Some(duration), config)
    }

    /// Queues a status whose lifetime is owned by the caller. It runs until
    /// cancelled, or for at most `max_duration_millis` when given.
    pub fn add_conditional(
        &mut self,
        payload: StatusPayload,
        max_duration_millis: Option<u32>,
        config: &CombatConfig,
    ) -> Option<StatusHandle> {
        let duration = max_duration_millis.map(|millis| config.ticks(millis));
        self.insert(payload, duration, config)
    }

    fn insert(
        &mut self,
        payload: StatusPayload,
        duration: Option<u64>,
        config: &CombatConfig,
    ) -> Option<StatusHandle> {
        if self.blacklist.contains(&payload.kind) {
            return None;
        }

        let suppressed = self.negative_immune && payload.kind.is_negative();
        let handle = StatusHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);

        self.timers.push(StatusTimer {
            handle,
            stage: Stage::Pending {
                remaining: config.ticks(payload.delay_millis),
            },
            duration: if suppressed { Some(0) } else { duration },
            payload,
            cancel_requested: false,
            suppressed,
        });

        (!suppressed).then_some(handle)
    }

    /// Flags one timer for cancellation. Returns `false` if it already ended.
    pub fn request_cancel(&mut self, handle: StatusHandle) -> bool {
        match self.timers.iter_mut().find(|timer| timer.handle == handle) {
            Some(timer) => {
                timer.cancel_requested = true;
                true
            }
            None => false,
        }
    }

    /// Cancels every status queued so far, on the next advance.
    pub fn cancel_all(&mut self) {
        self.cancel_all_below = Some(StatusHandle(self.next_handle));
    }

    /// Cancels every weapon-bound status queued so far, on the next advance.
    pub fn cancel_weapon_bound(&mut self) {
        self.cancel_weapon_below = Some(StatusHandle(self.next_handle));
    }

    /// Advances every timer by one tick.
    pub fn advance(&mut self, config: &CombatConfig, target: &mut impl Hittable) -> StatusTick {
        let mut tick = StatusTick::default();
        let step_seconds = config.step_seconds();
        let timers = std::mem::take(&mut self.timers);
        let mut kept = Vec::with_capacity(timers.len());

        for mut timer in timers {
            if self.is_cancelled(&timer) {
                if timer.is_active() {
                    self.reverse(&timer);
                }
                tick.expired.push((timer.handle, timer.payload.kind));
                continue;
            }

            if let Stage::Pending { remaining } = timer.stage {
                let remaining = remaining.saturating_sub(1);
                if remaining > 0 {
                    timer.stage = Stage::Pending { remaining };
                    kept.push(timer);
                    continue;
                }
                self.activate(&timer);
                timer.stage = Stage::Active {
                    remaining: timer.duration,
                };
            }

            let Stage::Active { remaining } = timer.stage else {
                kept.push(timer);
                continue;
            };

            if remaining == Some(0) {
                self.reverse(&timer);
                tick.expired.push((timer.handle, timer.payload.kind));
                continue;
            }

            if !timer.suppressed {
                self.apply_periodic(&timer.payload, step_seconds, target, &mut tick);
            }
            timer.stage = Stage::Active {
                remaining: remaining.map(|left| left - 1),
            };
            kept.push(timer);
        }

        self.timers = kept;
        self.cancel_all_below = None;
        self.cancel_weapon_below = None;
        tick
    }

    /// Reverses and drops every timer immediately. Used when an agent is reset.
    pub fn clear(&mut self) -> Vec<(StatusHandle, StatusKind)> {
        let timers = std::mem::take(&mut self.timers);
        let mut cleared = Vec::with_capacity(timers.len());
        for timer in timers {
            if timer.is_active() {
                self.reverse(&timer);
            }
            cleared.push((timer.handle, timer.payload.kind));
        }
        self.cancel_all_below = None;
        self.cancel_weapon_below = None;
        cleared
    }

    fn is_cancelled(&self, timer: &StatusTimer) -> bool {
        timer.cancel_requested
            || self.cancel_all_below.is_some_and(|mark| timer.handle < mark)
            || (timer.payload.weapon_bound
                && self.cancel_weapon_below.is_some_and(|mark| timer.handle < mark))
    }

    fn activate(&mut self, timer: &StatusTimer) {
        if timer.suppressed {
            return;
        }
        let payload = &timer.payload;
        match payload.kind.effect() {
            EffectClass::Multiplier(accumulator, direction) => {
                self.multipliers
                    .get_mut(accumulator)
                    .push(timer.handle, payload.factor(direction));
            }
            EffectClass::Channel(channel, direction) => {
                self.channels.get_mut(channel).push(
                    timer.handle,
                    payload.percentage,
                    direction.sign() * payload.magnitude,
                );
            }
            EffectClass::Periodic(_) | EffectClass::Marker => {}
        }
        *self.active.entry(payload.kind).or_default() += 1;
    }

    fn reverse(&mut self, timer: &StatusTimer) {
        if timer.suppressed {
            return;
        }
        match timer.payload.kind.effect() {
            EffectClass::Multiplier(accumulator, _) => {
                self.multipliers.get_mut(accumulator).remove(timer.handle);
            }
            EffectClass::Channel(channel, _) => {
                self.channels.get_mut(channel).remove(timer.handle);
            }
            EffectClass::Periodic(_) | EffectClass::Marker => {}
        }
        if let Some(count) = self.active.get_mut(&timer.payload.kind) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.active.remove(&timer.payload.kind);
            }
        }
    }

    fn apply_periodic(
        &self,
        payload: &StatusPayload,
        step_seconds: f32,
        target: &mut impl Hittable,
        tick: &mut StatusTick,
    ) {
        let EffectClass::Periodic(periodic) = payload.kind.effect() else {
            return;
        };
        let rate = |maximum: f32| {
            if payload.percentage {
                payload.magnitude / 100.0 * maximum
            } else {
                payload.magnitude
            }
        };
        match periodic {
            PeriodicTarget::HealthLoss => {
                let amount = rate(target.max_hp()) * step_seconds;
                tick.health_delta += target.apply_health_delta(-amount);
                if payload.source.is_some() {
                    tick.damage_source = payload.source;
                }
            }
            PeriodicTarget::HealthGain => {
                let amount = rate(target.max_hp()) * step_seconds * self.healing_multiplier();
                tick.health_delta += target.apply_health_delta(amount);
            }
            PeriodicTarget::StaminaGain => {
                let amount = rate(target.max_stamina()) * step_seconds;
                target.apply_stamina_delta(amount);
            }
        }
    }

    // ========================================================================
    // Immunity
    // ========================================================================

    pub fn set_negative_immune(&mut self, immune: bool) {
        self.negative_immune = immune;
    }

    pub fn is_negative_immune(&self) -> bool {
        self.negative_immune
    }

    /// Refuses future statuses of `kind`.
    pub fn blacklist(&mut self, kind: StatusKind) {
        self.blacklist.insert(kind);
    }

    pub fn unblacklist(&mut self, kind: StatusKind) {
        self.blacklist.remove(&kind);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Active kinds in a stable order.
    pub fn active_kinds(&self) -> impl Iterator<Item = StatusKind> + '_ {
        self.active.keys().copied()
    }

    /// Number of timers still pending or running.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.multipliers.damage.value()
    }

    pub fn damage_received_multiplier(&self) -> f32 {
        self.multipliers.damage_received.value()
    }

    pub fn defense_multiplier(&self) -> f32 {
        self.multipliers.defense.value()
    }

    pub fn healing_multiplier(&self) -> f32 {
        self.multipliers.healing.value()
    }

    pub fn channel(&self, channel: Channel) -> ChannelSnapshot {
        self.channels.get(channel).snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Vitals;
    use strum::IntoEnumIterator;

    fn config() -> CombatConfig {
        CombatConfig::with_step_millis(20)
    }

    fn vitals() -> Vitals {
        Vitals::new(100.0, 100.0, 50.0, 100.0)
    }

    #[derive(Debug, PartialEq)]
    struct Observed {
        damage: f32,
        damage_received: f32,
        defense: f32,
        healing: f32,
        movement: ChannelSnapshot,
        attack_speed: ChannelSnapshot,
        cooldown: ChannelSnapshot,
    }

    fn observe(effects: &StatusEffects) -> Observed {
        Observed {
            damage: effects.damage_multiplier(),
            damage_received: effects.damage_received_multiplier(),
            defense: effects.defense_multiplier(),
            healing: effects.healing_multiplier(),
            movement: effects.channel(Channel::MovementSpeed),
            attack_speed: effects.channel(Channel::AttackSpeed),
            cooldown: effects.channel(Channel::Cooldown),
        }
    }

    #[test]
    fn every_kind_restores_accumulators_after_expiry() {
        let config = config();
        for kind in StatusKind::iter() {
            let mut effects = StatusEffects::new();
            let mut target = vitals();
            // A long-lived unrelated modifier so reversal is checked against
            // a non-trivial baseline.
            effects.try_add(StatusPayload::new(StatusKind::DamageUp, 1.25, 1_000), &config);
            effects.advance(&config, &mut target);
            let before = observe(&effects);

            effects.try_add(StatusPayload::new(kind, 0.8, 60).with_delay(40), &config);
            for _ in 0..5 {
                effects.advance(&config, &mut target);
            }

            assert_eq!(observe(&effects), before, "{kind} was not reversed");
            assert!(!effects.is_active(kind) || kind == StatusKind::DamageUp);
        }
    }

    #[test]
    fn delayed_status_activates_after_delay() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        effects.try_add(
            StatusPayload::percent(StatusKind::DamageUp, 20.0, 100).with_delay(60),
            &config,
        );

        effects.advance(&config, &mut target);
        effects.advance(&config, &mut target);
        assert!(!effects.is_active(StatusKind::DamageUp));

        effects.advance(&config, &mut target);
        assert!(effects.is_active(StatusKind::DamageUp));
        assert!((effects.damage_multiplier() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_activates_and_expires_in_one_advance() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        effects.try_add(StatusPayload::new(StatusKind::Root, 1.0, 0), &config);

        let tick = effects.advance(&config, &mut target);
        assert_eq!(tick.expired.len(), 1);
        assert!(effects.is_empty());
        assert!(!effects.is_active(StatusKind::Root));
    }

    #[test]
    fn negative_immune_records_zero_duration() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        effects.set_negative_immune(true);

        assert!(effects
            .try_add(StatusPayload::new(StatusKind::Burn, 10.0, 1_000), &config)
            .is_none());
        assert_eq!(effects.len(), 1);

        let tick = effects.advance(&config, &mut target);
        assert_eq!(tick.health_delta, 0.0);
        assert_eq!(tick.expired, vec![(StatusHandle(0), StatusKind::Burn)]);
        assert_eq!(target.hp.current, 100.0);

        // Positive statuses are unaffected.
        assert!(effects
            .try_add(StatusPayload::new(StatusKind::Heal, 5.0, 100), &config)
            .is_some());
    }

    #[test]
    fn blacklisted_kind_is_refused() {
        let config = config();
        let mut effects = StatusEffects::new();
        effects.blacklist(StatusKind::Slow);
        assert!(effects
            .try_add(StatusPayload::new(StatusKind::Slow, 1.0, 100), &config)
            .is_none());
        assert!(effects.is_empty());
    }

    #[test]
    fn burn_deals_rate_per_second() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        effects.try_add(
            StatusPayload::new(StatusKind::Burn, 50.0, 1_000).with_source(AgentId(9)),
            &config,
        );

        let mut dealt = 0.0;
        for _ in 0..10 {
            let tick = effects.advance(&config, &mut target);
            dealt += tick.health_delta;
            assert_eq!(tick.damage_source, Some(AgentId(9)));
        }
        assert!((dealt + 10.0).abs() < 1e-3);
        assert!((target.hp.current - 90.0).abs() < 1e-3);
    }

    #[test]
    fn cancel_all_is_observed_on_next_advance() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        effects.try_add(StatusPayload::percent(StatusKind::DefenseDown, 30.0, 5_000), &config);
        effects.advance(&config, &mut target);
        assert!(effects.defense_multiplier() < 1.0);

        effects.cancel_all();
        // Added after the request: survives the cancellation.
        effects.try_add(StatusPayload::new(StatusKind::Heal, 1.0, 5_000), &config);
        assert!(effects.is_active(StatusKind::DefenseDown));

        effects.advance(&config, &mut target);
        assert_eq!(effects.defense_multiplier(), 1.0);
        assert!(!effects.is_active(StatusKind::DefenseDown));
        assert!(effects.is_active(StatusKind::Heal));
    }

    #[test]
    fn weapon_switch_cancels_only_weapon_bound() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        effects.try_add(
            StatusPayload::percent(StatusKind::AttackSpeedUp, 10.0, 5_000).weapon_bound(),
            &config,
        );
        effects.try_add(StatusPayload::percent(StatusKind::MovementSpeedUp, 10.0, 5_000), &config);
        effects.advance(&config, &mut target);

        effects.cancel_weapon_bound();
        effects.advance(&config, &mut target);

        assert!(!effects.is_active(StatusKind::AttackSpeedUp));
        assert!(effects.is_active(StatusKind::MovementSpeedUp));
        assert_eq!(effects.channel(Channel::AttackSpeed), ChannelSnapshot::default());
    }

    #[test]
    fn conditional_without_limit_runs_until_cancelled() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        let handle = effects
            .add_conditional(StatusPayload::new(StatusKind::Silence, 1.0, 0), None, &config)
            .unwrap();

        for _ in 0..500 {
            effects.advance(&config, &mut target);
        }
        assert!(effects.is_active(StatusKind::Silence));

        assert!(effects.request_cancel(handle));
        effects.advance(&config, &mut target);
        assert!(!effects.is_active(StatusKind::Silence));
        assert!(!effects.request_cancel(handle));
    }

    #[test]
    fn clear_reverses_everything_immediately() {
        let config = config();
        let mut effects = StatusEffects::new();
        let mut target = vitals();
        effects.try_add(StatusPayload::percent(StatusKind::Slow, 40.0, 5_000), &config);
        effects.try_add(StatusPayload::new(StatusKind::Burn, 1.0, 5_000).with_delay(1_000), &config);
        effects.advance(&config, &mut target);

        let cleared = effects.clear();
        assert_eq!(cleared.len(), 2);
        assert_eq!(effects.channel(Channel::MovementSpeed), ChannelSnapshot::default());
        assert_eq!(effects.active_kinds().count(), 0);
    }
}
