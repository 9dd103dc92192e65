//! Combat agents and the capability traits the rules consume.

use super::common::{AgentId, Meter, TeamId, Tick};
use crate::ailment::{AilmentKind, AilmentTimer};
use crate::attack::WeaponId;
use crate::combo::ComboState;
use crate::config::CombatConfig;
use crate::status::StatusEffects;

/// Anything that can lose and regain health through the status engine.
pub trait Hittable {
    fn max_hp(&self) -> f32;
    fn max_stamina(&self) -> f32;
    /// Applies a signed HP change and returns the change actually applied.
    fn apply_health_delta(&mut self, delta: f32) -> f32;
    fn apply_stamina_delta(&mut self, delta: f32) -> f32;
}

/// Read-only view the hit-validity checks run against.
pub trait Combatant {
    fn id(&self) -> AgentId;
    fn team(&self) -> TeamId;
    fn is_dead(&self) -> bool;
    fn is_invincible(&self, now: Tick) -> bool;
    fn is_uninterruptable(&self, now: Tick) -> bool;
    fn is_in_hit_stop(&self, now: Tick) -> bool;
    fn was_staggered_at(&self, now: Tick) -> bool;
    fn grabbed_by(&self) -> Option<AgentId>;
    fn grab_target(&self) -> Option<AgentId>;
}

/// Maximum values an agent spawns and respawns with.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentStats {
    pub max_hp: f32,
    pub max_stamina: f32,
    pub max_defense: f32,
    pub max_rage: f32,
}

impl AgentStats {
    pub const fn new(max_hp: f32, max_stamina: f32, max_defense: f32, max_rage: f32) -> Self {
        Self {
            max_hp,
            max_stamina,
            max_defense,
            max_rage,
        }
    }
}

impl Default for AgentStats {
    fn default() -> Self {
        Self::new(100.0, 100.0, 0.0, 100.0)
    }
}

/// Clamped resource meters of one agent.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub hp: Meter,
    pub stamina: Meter,
    pub defense: Meter,
    pub rage: Meter,
}

impl Vitals {
    /// Full HP, stamina and defense; empty rage.
    pub const fn new(max_hp: f32, max_stamina: f32, max_defense: f32, max_rage: f32) -> Self {
        Self {
            hp: Meter::full(max_hp),
            stamina: Meter::full(max_stamina),
            defense: Meter::full(max_defense),
            rage: Meter::empty(max_rage),
        }
    }

    pub const fn from_stats(stats: &AgentStats) -> Self {
        Self::new(
            stats.max_hp,
            stats.max_stamina,
            stats.max_defense,
            stats.max_rage,
        )
    }
}

impl Hittable for Vitals {
    fn max_hp(&self) -> f32 {
        self.hp.maximum
    }

    fn max_stamina(&self) -> f32 {
        self.stamina.maximum
    }

    fn apply_health_delta(&mut self, delta: f32) -> f32 {
        self.hp.apply_delta(delta)
    }

    fn apply_stamina_delta(&mut self, delta: f32) -> f32 {
        self.stamina.apply_delta(delta)
    }
}

/// Magazine of a ranged weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ammo {
    pub current: u16,
    pub capacity: u16,
}

impl Ammo {
    pub const fn full(capacity: u16) -> Self {
        Self {
            current: capacity,
            capacity,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerProfile {
    /// `None` for weapons without a magazine.
    pub ammo: Option<Ammo>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcProfile {
    pub boss: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentKind {
    Player(PlayerProfile),
    Npc(NpcProfile),
}

impl AgentKind {
    pub const fn is_player(&self) -> bool {
        matches!(self, Self::Player(_))
    }
}

/// Combat state of one agent, owned by the match.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatAgent {
    pub id: AgentId,
    pub kind: AgentKind,
    pub team: TeamId,
    pub stats: AgentStats,
    pub weapon: WeaponId,

    pub vitals: Vitals,
    pub ailment: AilmentKind,
    pub ailment_timer: Option<AilmentTimer>,

    // ===== timestamps: active while `now < until` =====
    pub invincible_until: Tick,
    pub uninterruptable_until: Tick,
    pub hit_stop_until: Tick,
    pub raging_until: Option<Tick>,

    /// Set on the tick this agent was interrupted by a melee hit.
    pub staggered_at: Option<Tick>,
    /// Presentation flag while in hit-stop.
    pub should_shake: bool,
    pub combo_counter: u32,
    pub blocking: bool,
    pub grabbed_by: Option<AgentId>,
    pub grab_target: Option<AgentId>,
    pub killed_by: Option<AgentId>,
    /// Hold time of the heavy attack being charged.
    pub charge_millis: u32,

    pub combo: ComboState,
    pub statuses: StatusEffects,
}

impl CombatAgent {
    pub fn new(
        id: AgentId,
        kind: AgentKind,
        team: TeamId,
        stats: AgentStats,
        weapon: WeaponId,
    ) -> Self {
        Self {
            id,
            kind,
            team,
            stats,
            weapon,
            vitals: Vitals::from_stats(&stats),
            ailment: AilmentKind::None,
            ailment_timer: None,
            invincible_until: Tick::ZERO,
            uninterruptable_until: Tick::ZERO,
            hit_stop_until: Tick::ZERO,
            raging_until: None,
            staggered_at: None,
            should_shake: false,
            combo_counter: 0,
            blocking: false,
            grabbed_by: None,
            grab_target: None,
            killed_by: None,
            charge_millis: 0,
            combo: ComboState::default(),
            statuses: StatusEffects::new(),
        }
    }

    pub fn player(id: AgentId, team: TeamId, stats: AgentStats, weapon: WeaponId) -> Self {
        Self::new(id, AgentKind::Player(PlayerProfile::default()), team, stats, weapon)
    }

    pub fn npc(id: AgentId, team: TeamId, stats: AgentStats, weapon: WeaponId) -> Self {
        Self::new(id, AgentKind::Npc(NpcProfile::default()), team, stats, weapon)
    }

    #[must_use]
    pub fn with_ammo(mut self, capacity: u16) -> Self {
        if let AgentKind::Player(profile) = &mut self.kind {
            profile.ammo = Some(Ammo::full(capacity));
        }
        self
    }

    pub fn ammo(&self) -> Option<Ammo> {
        match &self.kind {
            AgentKind::Player(profile) => profile.ammo,
            AgentKind::Npc(_) => None,
        }
    }

    pub fn ammo_mut(&mut self) -> Option<&mut Ammo> {
        match &mut self.kind {
            AgentKind::Player(profile) => profile.ammo.as_mut(),
            AgentKind::Npc(_) => None,
        }
    }

    pub fn is_raging(&self, now: Tick) -> bool {
        self.raging_until.is_some_and(|until| now < until)
    }

    /// Extends invincibility to at least `ticks` from `now`.
    pub fn grant_invincibility(&mut self, now: Tick, ticks: u64) {
        self.invincible_until = self.invincible_until.max(now + ticks);
    }

    pub fn grant_uninterruptable(&mut self, now: Tick, ticks: u64) {
        self.uninterruptable_until = self.uninterruptable_until.max(now + ticks);
    }

    /// Switches to `kind` and starts its reset timer. Returns the previous ailment.
    pub fn enter_ailment(
        &mut self,
        kind: AilmentKind,
        now: Tick,
        config: &CombatConfig,
    ) -> AilmentKind {
        let previous = std::mem::replace(&mut self.ailment, kind);
        self.ailment_timer = AilmentTimer::start(kind, now, config);
        previous
    }

    /// Re-enters Knockup, restarting airtime and optionally keeping the juggle count.
    pub fn relaunch(&mut self, keep_juggle: bool, now: Tick, config: &CombatConfig) -> AilmentKind {
        let previous = std::mem::replace(&mut self.ailment, AilmentKind::Knockup);
        let timer = if previous == AilmentKind::Knockup {
            self.ailment_timer
        } else {
            None
        };
        self.ailment_timer = Some(AilmentTimer::relaunch(timer, keep_juggle, now, config));
        previous
    }

    pub fn clear_ailment(&mut self) -> AilmentKind {
        self.ailment_timer = None;
        std::mem::replace(&mut self.ailment, AilmentKind::None)
    }

    /// Restores spawn state. Statuses are reversed immediately.
    pub fn respawn(&mut self) {
        self.statuses.clear();
        self.vitals = Vitals::from_stats(&self.stats);
        self.ailment = AilmentKind::None;
        self.ailment_timer = None;
        self.invincible_until = Tick::ZERO;
        self.uninterruptable_until = Tick::ZERO;
        self.hit_stop_until = Tick::ZERO;
        self.raging_until = None;
        self.staggered_at = None;
        self.should_shake = false;
        self.combo_counter = 0;
        self.blocking = false;
        self.grabbed_by = None;
        self.grab_target = None;
        self.killed_by = None;
        self.charge_millis = 0;
        self.combo.reset();
        if let Some(ammo) = self.ammo_mut() {
            ammo.current = ammo.capacity;
        }
    }
}

impl Combatant for CombatAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn team(&self) -> TeamId {
        self.team
    }

    fn is_dead(&self) -> bool {
        self.ailment.is_dead()
    }

    fn is_invincible(&self, now: Tick) -> bool {
        now < self.invincible_until
    }

    fn is_uninterruptable(&self, now: Tick) -> bool {
        now < self.uninterruptable_until
    }

    fn is_in_hit_stop(&self, now: Tick) -> bool {
        now < self.hit_stop_until
    }

    fn was_staggered_at(&self, now: Tick) -> bool {
        self.staggered_at == Some(now)
    }

    fn grabbed_by(&self) -> Option<AgentId> {
        self.grabbed_by
    }

    fn grab_target(&self) -> Option<AgentId> {
        self.grab_target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{StatusKind, StatusPayload};

    fn agent() -> CombatAgent {
        let stats = AgentStats::new(100.0, 50.0, 20.0, 100.0);
        CombatAgent::player(AgentId(1), TeamId(1), stats, WeaponId(1)).with_ammo(6)
    }

    #[test]
    fn invincibility_only_extends() {
        let mut agent = agent();
        agent.grant_invincibility(Tick(10), 50);
        agent.grant_invincibility(Tick(20), 5);
        assert_eq!(agent.invincible_until, Tick(60));
        assert!(agent.is_invincible(Tick(59)));
        assert!(!agent.is_invincible(Tick(60)));
    }

    #[test]
    fn relaunch_from_other_ailment_resets_juggle() {
        let config = CombatConfig::new();
        let mut agent = agent();
        agent.enter_ailment(AilmentKind::Stun, Tick(0), &config);
        let previous = agent.relaunch(true, Tick(1), &config);
        assert_eq!(previous, AilmentKind::Stun);
        assert_eq!(agent.ailment_timer.map(|t| t.juggle_hits()), Some(0));
    }

    #[test]
    fn respawn_restores_spawn_state() {
        let config = CombatConfig::new();
        let mut agent = agent();
        agent.vitals.hp.drain(100.0);
        agent.enter_ailment(AilmentKind::Death, Tick(3), &config);
        agent.killed_by = Some(AgentId(2));
        agent.ammo_mut().unwrap().current = 0;
        agent
            .statuses
            .try_add(StatusPayload::percent(StatusKind::Slow, 50.0, 10_000), &config);

        agent.respawn();

        assert!(!agent.is_dead());
        assert_eq!(agent.vitals.hp.current, 100.0);
        assert_eq!(agent.vitals.rage.current, 0.0);
        assert_eq!(agent.killed_by, None);
        assert_eq!(agent.ammo(), Some(Ammo::full(6)));
        assert!(agent.statuses.is_empty());
    }
}
