use std::collections::BTreeMap;
use std::sync::Mutex;

use combat_core::{
    AgentId, AgentStats, AilmentKind, AnimationPlayer, AttackDefinition, AttackId, AttackTable,
    ClipId, CombatAgent, CombatConfig, CombatEvent, Env, HitCounter, HitRequest,
    InputToken, MatchContext, MitigationTier, ReplicatedFields, Ruleset, StatusKind,
    StatusPayload, TeamId, Tick, WeaponId,
};

const SWORD: WeaponId = WeaponId(1);
const ATTACKER: AgentId = AgentId(1);
const VICTIM: AgentId = AgentId(2);

const JAB: AttackId = AttackId(1);
const STUNNER: AttackId = AttackId(2);
const SELECTIVE: AttackId = AttackId(3);
const LAUNCHER: AttackId = AttackId(4);
const EXECUTE: AttackId = AttackId(5);
const MEND: AttackId = AttackId(6);
const TAP: AttackId = AttackId(7);

#[derive(Default)]
struct Stage {
    clips: Mutex<BTreeMap<AgentId, ClipId>>,
}

impl AnimationPlayer for Stage {
    fn is_at_rest(&self, agent: AgentId) -> bool {
        !self.clips.lock().unwrap().contains_key(&agent)
    }

    fn is_playing_clip(&self, agent: AgentId, clip: ClipId) -> bool {
        self.clips.lock().unwrap().get(&agent) == Some(&clip)
    }

    fn normalized_time(&self, _agent: AgentId, _clip: ClipId) -> Option<f32> {
        None
    }
}

struct Fixture {
    table: AttackTable,
    stage: Stage,
    rules: Ruleset,
    ctx: MatchContext,
}

impl Fixture {
    fn new() -> Self {
        let mut selective = AttackDefinition::new(SELECTIVE, "selective", &[InputToken::Ability1], 10.0)
            .with_ailment(AilmentKind::Stun)
            .with_hit_limit(3);
        selective.ailment_hits.extend([true, false, true]);

        let table = AttackTable::new().with_weapon(
            SWORD,
            vec![
                AttackDefinition::new(JAB, "jab", &[InputToken::LightAttack], 10.0),
                AttackDefinition::new(STUNNER, "stunner", &[InputToken::HeavyAttack], 10.0)
                    .with_ailment(AilmentKind::Stun)
                    .with_hit_limit(5)
                    .with_on_hit(StatusPayload::new(StatusKind::Burn, 1.0, 1_000)),
                selective,
                AttackDefinition::new(LAUNCHER, "launcher", &[InputToken::Ability2], 10.0)
                    .with_ailment(AilmentKind::Knockup)
                    .with_hit_limit(20),
                AttackDefinition::new(EXECUTE, "execute", &[InputToken::Ability3], 500.0)
                    .with_on_hit(StatusPayload::new(StatusKind::Burn, 1.0, 1_000)),
                AttackDefinition::new(MEND, "mend", &[InputToken::Ability4], 10.0)
                    .with_on_teammate(StatusPayload::new(StatusKind::Heal, 10.0, 1_000)),
                AttackDefinition::new(TAP, "tap", &[InputToken::Ability1], 0.0)
                    .with_ailment(AilmentKind::Stun)
                    .with_on_hit(StatusPayload::new(StatusKind::Slow, 0.3, 1_000)),
            ],
        );

        let mut ctx = MatchContext::server(CombatConfig::new());
        let stats = AgentStats::default();
        ctx.spawn(CombatAgent::player(ATTACKER, TeamId(1), stats, SWORD))
            .unwrap();
        ctx.spawn(CombatAgent::player(VICTIM, TeamId(2), stats, SWORD))
            .unwrap();

        Self {
            table,
            stage: Stage::default(),
            rules: Ruleset::Teams,
            ctx,
        }
    }

    fn hit(&mut self, attack: AttackId) -> bool {
        let env = Env::with_all(&self.table, &self.stage, &self.rules).into_combat_env();
        self.ctx
            .resolve_melee_hit(&env, &HitRequest::melee(ATTACKER, VICTIM, attack))
    }

    /// Steps past the shared hit-stop so the attacker can connect again.
    fn settle(&mut self) {
        let env = Env::with_all(&self.table, &self.stage, &self.rules).into_combat_env();
        for _ in 0..5 {
            assert!(self.ctx.step(&env));
        }
    }

    fn victim(&self) -> &CombatAgent {
        self.ctx.agent(VICTIM).unwrap()
    }
}

#[test]
fn clean_hit_damages_and_counts_combo() {
    let mut fixture = Fixture::new();
    assert!(fixture.hit(JAB));

    assert_eq!(fixture.victim().vitals.hp.current, 90.0);
    assert!(fixture.victim().should_shake);
    let attacker = fixture.ctx.agent(ATTACKER).unwrap();
    assert_eq!(attacker.combo_counter, 1);
    assert!(attacker.hit_stop_until > Tick::ZERO);
    assert!(attacker.vitals.rage.current > 0.0);

    let events = fixture.ctx.drain_events();
    assert!(matches!(
        events.first(),
        Some(CombatEvent::Hit { tier: MitigationTier::Unprotected, hp_delta, .. }) if *hp_delta == -10.0
    ));
}

#[test]
fn repeat_hit_within_one_attack_is_gated() {
    let mut fixture = Fixture::new();
    assert!(fixture.hit(JAB));
    fixture.settle();
    assert!(!fixture.hit(JAB));
    assert_eq!(fixture.victim().vitals.hp.current, 90.0);
}

#[test]
fn invincible_victim_is_untouched() {
    let mut fixture = Fixture::new();
    fixture.ctx.agent_mut(VICTIM).unwrap().invincible_until = Tick(10);

    assert!(!fixture.hit(STUNNER));
    assert_eq!(fixture.victim().vitals.hp.current, 100.0);
    assert_eq!(fixture.victim().ailment, AilmentKind::None);
    assert!(fixture.victim().statuses.is_empty());
}

#[test]
fn teammates_receive_support_statuses_instead_of_damage() {
    let mut fixture = Fixture::new();
    fixture.ctx.agent_mut(VICTIM).unwrap().team = TeamId(1);
    fixture.ctx.agent_mut(VICTIM).unwrap().vitals.hp.current = 50.0;

    assert!(!fixture.hit(MEND));
    assert_eq!(fixture.victim().vitals.hp.current, 50.0);
    assert_eq!(fixture.victim().statuses.len(), 1);
    assert!(
        fixture
            .ctx
            .drain_events()
            .iter()
            .any(|event| matches!(event, CombatEvent::StatusApplied { kind: StatusKind::Heal, .. }))
    );
}

#[test]
fn competitor_ruleset_allows_same_team_damage() {
    let mut fixture = Fixture::new();
    fixture.rules = Ruleset::Competitor;
    fixture.ctx.agent_mut(VICTIM).unwrap().team = TeamId(1);

    assert!(fixture.hit(JAB));
    assert_eq!(fixture.victim().vitals.hp.current, 90.0);
}

#[test]
fn second_stun_knocks_down() {
    let mut fixture = Fixture::new();
    assert!(fixture.hit(STUNNER));
    assert_eq!(fixture.victim().ailment, AilmentKind::Stun);

    fixture.settle();
    assert!(fixture.hit(STUNNER));
    assert_eq!(fixture.victim().ailment, AilmentKind::Knockdown);
}

#[test]
fn ineligible_hit_index_applies_no_ailment() {
    let mut fixture = Fixture::new();
    assert!(fixture.hit(SELECTIVE));
    assert_eq!(fixture.victim().ailment, AilmentKind::Stun);

    // Second hit is marked ineligible: it feeds None, which clears the stun.
    fixture.settle();
    assert!(fixture.hit(SELECTIVE));
    assert_eq!(fixture.victim().ailment, AilmentKind::None);

    fixture.settle();
    assert!(fixture.hit(SELECTIVE));
    assert_eq!(fixture.victim().ailment, AilmentKind::Stun);
}

#[test]
fn uninterruptable_victim_takes_damage_but_no_ailment() {
    let mut fixture = Fixture::new();
    fixture
        .ctx
        .agent_mut(VICTIM)
        .unwrap()
        .grant_uninterruptable(Tick::ZERO, 100);

    assert!(fixture.hit(STUNNER));
    assert_eq!(fixture.victim().vitals.hp.current, 90.0);
    assert_eq!(fixture.victim().ailment, AilmentKind::None);
    assert_eq!(fixture.victim().staggered_at, None);
}

#[test]
fn lethal_hit_kills_and_cancels_statuses() {
    let mut fixture = Fixture::new();
    assert!(fixture.ctx.try_add_status(
        VICTIM,
        StatusPayload::percent(StatusKind::DamageReceivedUp, 50.0, 10_000),
    ));
    fixture.settle();
    assert_eq!(fixture.victim().statuses.damage_received_multiplier(), 1.5);
    fixture.ctx.drain_events();

    assert!(fixture.hit(EXECUTE));
    let victim = fixture.victim();
    assert_eq!(victim.ailment, AilmentKind::Death);
    assert_eq!(victim.killed_by, Some(ATTACKER));
    assert_eq!(victim.vitals.hp.current, 0.0);

    let events = fixture.ctx.drain_events();
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::Killed { victim: VICTIM, killer: Some(ATTACKER) }
    )));
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, CombatEvent::StatusApplied { .. }))
    );

    fixture.settle();
    assert!(fixture.victim().statuses.is_empty());
    assert_eq!(fixture.victim().statuses.damage_received_multiplier(), 1.0);

    // The dead stay dead.
    assert!(!fixture.hit(JAB));
}

#[test]
fn full_defense_blocks_without_reaction() {
    let mut fixture = Fixture::new();
    {
        let victim = fixture.ctx.agent_mut(VICTIM).unwrap();
        victim.vitals.defense.maximum = 50.0;
        victim.vitals.defense.current = 50.0;
        victim.blocking = true;
    }

    assert!(fixture.hit(STUNNER));
    let victim = fixture.victim();
    assert_eq!(victim.vitals.hp.current, 100.0);
    assert!(victim.vitals.defense.current < 50.0);
    assert_eq!(victim.ailment, AilmentKind::None);
    assert!(victim.statuses.is_empty());

    let events = fixture.ctx.drain_events();
    assert!(events.iter().any(|event| matches!(event, CombatEvent::Blocked { .. })));
    assert!(events.iter().any(|event| matches!(
        event,
        CombatEvent::PlayClip { clip: ClipId::BlockReaction, .. }
    )));
}

#[test]
fn juggle_ceiling_forces_release() {
    let mut fixture = Fixture::new();
    let ceiling = fixture.ctx.config().juggle_hit_ceiling;

    assert!(fixture.hit(LAUNCHER));
    assert_eq!(fixture.victim().ailment, AilmentKind::Knockup);

    for _ in 1..ceiling {
        fixture.settle();
        assert!(fixture.hit(LAUNCHER));
        assert_eq!(fixture.victim().ailment, AilmentKind::Knockup);
    }

    fixture.settle();
    assert!(fixture.hit(LAUNCHER));
    let victim = fixture.victim();
    assert_eq!(victim.ailment, AilmentKind::None);
    assert!(victim.invincible_until > fixture.ctx.now());
}

#[test]
fn melee_shakes_and_projectiles_do_not() {
    let mut fixture = Fixture::new();
    let env = Env::with_all(&fixture.table, &fixture.stage, &fixture.rules).into_combat_env();
    let mut counter = HitCounter::for_attack(ATTACKER, JAB);
    assert!(fixture.ctx.resolve_hit(
        &env,
        &mut counter,
        &HitRequest::projectile(ATTACKER, VICTIM, JAB),
    ));
    assert!(!fixture.ctx.agent(VICTIM).unwrap().should_shake);

    for _ in 0..5 {
        fixture.ctx.step(&env);
    }
    assert!(
        fixture
            .ctx
            .resolve_melee_hit(&env, &HitRequest::melee(ATTACKER, VICTIM, JAB))
    );
    assert!(fixture.ctx.agent(VICTIM).unwrap().should_shake);

    for _ in 0..5 {
        fixture.ctx.step(&env);
    }
    assert!(!fixture.ctx.agent(VICTIM).unwrap().should_shake);
}

#[test]
fn foreign_counter_is_refused_without_mutation() {
    let mut fixture = Fixture::new();
    let env = Env::with_all(&fixture.table, &fixture.stage, &fixture.rules).into_combat_env();
    let mut counter = HitCounter::new(VICTIM);

    assert!(!fixture.ctx.resolve_hit(
        &env,
        &mut counter,
        &HitRequest::melee(ATTACKER, VICTIM, JAB),
    ));
    assert_eq!(fixture.ctx.agent(VICTIM).unwrap().vitals.hp.current, 100.0);
    assert_eq!(counter.hits(VICTIM), 0);
}

#[test]
fn unknown_attack_is_refused() {
    let mut fixture = Fixture::new();
    assert!(!fixture.hit(AttackId(99)));
    assert_eq!(fixture.victim().vitals.hp.current, 100.0);
}

#[test]
fn clients_never_resolve_hits() {
    let mut fixture = Fixture::new();
    let mut client = MatchContext::client(CombatConfig::new());
    for agent in fixture.ctx.agents() {
        client.spawn(agent.clone()).unwrap();
    }
    fixture.ctx = client;

    assert!(!fixture.hit(JAB));
    assert_eq!(fixture.victim().vitals.hp.current, 100.0);
    let env = Env::with_all(&fixture.table, &fixture.stage, &fixture.rules).into_combat_env();
    assert!(!fixture.ctx.step(&env));
}

#[test]
fn on_hit_status_waits_for_hit_stop() {
    let mut fixture = Fixture::new();
    assert!(fixture.hit(STUNNER));
    assert!(!fixture.victim().statuses.is_active(StatusKind::Burn));

    let env = Env::with_all(&fixture.table, &fixture.stage, &fixture.rules).into_combat_env();
    let delay = fixture
        .ctx
        .config()
        .ticks(fixture.ctx.config().post_hit_stop_status_delay_millis);
    for _ in 0..delay {
        fixture.ctx.step(&env);
    }
    assert!(fixture.ctx.agent(VICTIM).unwrap().statuses.is_active(StatusKind::Burn));
}

#[test]
fn replication_reports_touched_fields() {
    let mut fixture = Fixture::new();
    fixture.ctx.drain_replication();

    assert!(fixture.hit(STUNNER));
    let snapshots = fixture.ctx.drain_replication();
    let victim = snapshots.iter().find(|snapshot| snapshot.id == VICTIM).unwrap();
    assert!(victim.fields.contains(ReplicatedFields::HP | ReplicatedFields::AILMENT));
    assert_eq!(victim.hp, 90.0);
    assert_eq!(victim.ailment, AilmentKind::Stun);

    let attacker = snapshots.iter().find(|snapshot| snapshot.id == ATTACKER).unwrap();
    assert!(attacker.fields.contains(ReplicatedFields::COMBO_COUNTER));
    assert_eq!(attacker.combo_counter, 1);

    assert!(fixture.ctx.drain_replication().is_empty());
}

#[test]
fn harmless_hit_registers_without_side_effects() {
    let mut fixture = Fixture::new();
    assert!(fixture.hit(TAP));

    let victim = fixture.victim();
    assert_eq!(victim.vitals.hp.current, 100.0);
    assert_eq!(victim.ailment, AilmentKind::None);
    assert!(victim.statuses.is_empty());
    assert!(!victim.should_shake);
    assert_eq!(fixture.ctx.agent(ATTACKER).unwrap().combo_counter, 0);

    let events = fixture.ctx.drain_events();
    assert!(events.iter().any(|event| matches!(event, CombatEvent::Hit { .. })));
    assert!(!events.iter().any(|event| matches!(
        event,
        CombatEvent::StatusApplied { .. }
            | CombatEvent::AilmentChanged { .. }
            | CombatEvent::PlayClip { .. }
    )));
}
