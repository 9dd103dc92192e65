//! Hit resolution orchestration.
//!
//! 1. Authority, counter ownership and lookup checks (invariant violations)
//! 2. Validity checks (expected rejections)
//! 3. Register the hit, compute damage and mitigation
//! 4. Apply meters, ailment transition, death, hit-stop, rage, statuses
//! 5. Emit feedback events and mark replicated fields dirty
//!
//! Every invariant violation is detected before the first mutation.

use tracing::debug;

use super::damage::{self, Mitigation, MitigationTier};
use super::request::{HitDelivery, HitOutcome, HitRejection, HitReport, HitRequest};
use super::validation;
use crate::ailment::{AilmentKind, Override, resolve as resolve_ailment};
use crate::attack::{AttackDefinition, AttackFlags, HitCounter};
use crate::engine::{CombatEvent, MatchContext, ReplicatedFields};
use crate::env::{ClipId, CombatEnv};
use crate::error::CombatError;
use crate::state::{AgentId, Combatant};

pub(crate) fn resolve(
    ctx: &mut MatchContext,
    env: &CombatEnv<'_>,
    counter: &mut HitCounter,
    request: &HitRequest,
) -> Result<HitOutcome, CombatError> {
    ctx.require_authority("resolve_hit")?;

    if counter.owner() != request.attacker {
        return Err(CombatError::ForeignHitCounter {
            owner: counter.owner(),
            attacker: request.attacker,
        });
    }
    if request.attacker == request.victim {
        return Err(CombatError::SelfHit(request.attacker));
    }

    let catalog = env.catalog()?;
    let rules = env.rules()?;
    let attack = catalog
        .attack(request.attack)
        .ok_or(CombatError::UnknownAttack(request.attack))?;

    let now = ctx.clock;
    let attacker = ctx
        .agents
        .get(&request.attacker)
        .ok_or(CombatError::UnknownAgent(request.attacker))?;
    let victim = ctx
        .agents
        .get(&request.victim)
        .ok_or(CombatError::UnknownAgent(request.victim))?;

    if counter.attack() != Some(attack.id) {
        counter.reset(attack.id);
    }

    let valid = match validation::check(
        attacker,
        victim,
        attack,
        counter,
        rules,
        request.delivery,
        now,
        &ctx.config,
    ) {
        Ok(valid) => valid,
        Err(rejection) => {
            debug!(
                attacker = %request.attacker,
                victim = %request.victim,
                attack = %attack.id,
                reason = %rejection,
                "hit rejected"
            );
            if rejection == HitRejection::FriendlyFire {
                apply_teammate_statuses(ctx, attack, request)?;
            }
            return Ok(HitOutcome::Rejected(rejection));
        }
    };

    let raw = damage::raw_damage(
        attack,
        attacker,
        victim,
        request.damage_multiplier,
        &ctx.config,
        now,
    );
    let mitigation = damage::mitigate(raw, victim, &ctx.config);
    let hit_number = counter.register(request.victim, now);

    let report = apply_to_victim(
        ctx,
        attack,
        request,
        &mitigation,
        raw,
        hit_number,
        valid.interrupts_victim,
    )?;
    if raw < 0.0 {
        apply_to_attacker(ctx, request, -raw)?;
    }
    if raw < 0.0 && !report.killed && mitigation.tier != MitigationTier::Full {
        apply_on_hit_statuses(ctx, attack, request)?;
    }

    debug!(
        attacker = %request.attacker,
        victim = %request.victim,
        attack = %attack.id,
        hit = hit_number,
        tier = %report.tier,
        hp_delta = report.hp_delta,
        ailment = %report.ailment,
        "hit registered"
    );
    Ok(HitOutcome::Registered(report))
}

fn apply_teammate_statuses(
    ctx: &mut MatchContext,
    attack: &AttackDefinition,
    request: &HitRequest,
) -> Result<(), CombatError> {
    for payload in &attack.on_teammate {
        let payload = payload.clone().with_source(request.attacker);
        ctx.add_status(request.victim, payload)?;
    }
    Ok(())
}

/// On-hit statuses start after the shared hit-stop.
fn apply_on_hit_statuses(
    ctx: &mut MatchContext,
    attack: &AttackDefinition,
    request: &HitRequest,
) -> Result<(), CombatError> {
    let extra_delay = ctx.config.post_hit_stop_status_delay_millis;
    for payload in &attack.on_hit {
        let delay = payload.delay_millis.saturating_add(extra_delay);
        let payload = payload
            .clone()
            .with_delay(delay)
            .with_source(request.attacker);
        ctx.add_status(request.victim, payload)?;
    }
    Ok(())
}

fn apply_to_victim(
    ctx: &mut MatchContext,
    attack: &AttackDefinition,
    request: &HitRequest,
    mitigation: &Mitigation,
    raw: f32,
    hit_number: u32,
    interrupts: bool,
) -> Result<HitReport, CombatError> {
    let now = ctx.clock;
    let config = ctx.config.clone();
    let attacker_id = request.attacker;
    let victim = ctx.try_agent_mut(request.victim)?;

    if interrupts {
        victim.staggered_at = Some(now);
    }

    let hp_delta = victim.vitals.hp.apply_delta(mitigation.hp_delta);
    victim.vitals.defense.apply_delta(mitigation.defense_delta);
    victim.vitals.stamina.apply_delta(mitigation.stamina_delta);
    let killed = mitigation.hp_delta < 0.0 && victim.vitals.hp.is_empty();

    if raw < 0.0 {
        let until = now + config.ticks(config.hit_stop_millis);
        victim.hit_stop_until = victim.hit_stop_until.max(until);
        match request.delivery {
            HitDelivery::Melee => victim.should_shake = true,
            HitDelivery::Projectile => {}
        }
    }
    let taken = -hp_delta;
    if taken > 0.0 && !killed && !victim.is_raging(now) {
        victim.vitals.rage.restore(taken * config.rage_gain_taken);
    }

    let mut events = vec![CombatEvent::Hit {
        attacker: attacker_id,
        victim: request.victim,
        attack: attack.id,
        delivery: request.delivery,
        tier: mitigation.tier,
        hp_delta,
        impact_point: request.impact_point,
        source_point: request.source_point,
    }];

    let previous = victim.ailment;
    let mut released = false;
    if killed {
        victim.enter_ailment(AilmentKind::Death, now, &config);
        victim.killed_by = Some(attacker_id);
        victim.statuses.cancel_all();
        victim.raging_until = None;
        victim.combo.reset();
    } else if mitigation.tier == MitigationTier::Full {
        events.push(CombatEvent::Blocked {
            attacker: attacker_id,
            victim: request.victim,
            impact_point: request.impact_point,
        });
        events.push(CombatEvent::PlayClip {
            agent: request.victim,
            clip: ClipId::BlockReaction,
        });
    } else if raw < 0.0 && !victim.is_uninterruptable(now) {
        let mut incoming = if attack.ailment_eligible(hit_number) {
            attack.ailment
        } else {
            AilmentKind::None
        };
        if mitigation.force_stagger {
            incoming = AilmentKind::Stagger;
        }
        let resolution =
            resolve_ailment(previous, incoming, attack.is_follow_up(), attack.is_flash());

        if resolution.ailment != previous || resolution.forced {
            if resolution.ailment == AilmentKind::Knockup {
                let keep_juggle = resolution.trigger == Some(Override::FlashClip);
                victim.relaunch(keep_juggle, now, &config);
            } else {
                victim.enter_ailment(resolution.ailment, now, &config);
            }
            if !resolution.ailment.is_none() {
                events.push(CombatEvent::PlayClip {
                    agent: request.victim,
                    clip: ClipId::Reaction(resolution.ailment),
                });
            }
        }

        if previous == AilmentKind::Knockup
            && victim.ailment == AilmentKind::Knockup
            && victim
                .ailment_timer
                .as_mut()
                .is_some_and(|timer| timer.register_juggle_hit(config.juggle_hit_ceiling))
        {
            victim.clear_ailment();
            let invincible = config.ticks(config.juggle_release_invincibility_millis);
            victim.grant_invincibility(now, invincible);
            released = true;
        }

        if mitigation.hit_reaction {
            victim.combo.history.clear();
        }
    }

    let ailment = victim.ailment;
    let grab_target = victim.grab_target;
    let grabbed = ailment == AilmentKind::Grab && attack.flags.contains(AttackFlags::GRAB);
    if grabbed {
        victim.grabbed_by = Some(attacker_id);
    }
    if killed {
        victim.grabbed_by = None;
        victim.grab_target = None;
    }

    if ailment != previous {
        events.push(CombatEvent::AilmentChanged {
            agent: request.victim,
            from: previous,
            to: ailment,
        });
    }
    if released {
        debug!(victim = %request.victim, "juggle ceiling reached, victim released");
    }
    if killed {
        events.push(CombatEvent::Killed {
            victim: request.victim,
            killer: Some(attacker_id),
        });
    }

    if grabbed {
        if let Some(attacker) = ctx.agents.get_mut(&attacker_id) {
            attacker.grab_target = Some(request.victim);
        }
    }
    if killed {
        release_grab_links(ctx, request.victim, grab_target);
    }

    ctx.events.extend(events);
    ctx.mark_dirty(
        request.victim,
        ReplicatedFields::HP
            | ReplicatedFields::DEFENSE
            | ReplicatedFields::STAMINA
            | ReplicatedFields::RAGE
            | ReplicatedFields::AILMENT
            | ReplicatedFields::STATUSES,
    );

    Ok(HitReport {
        hit_number,
        tier: mitigation.tier,
        hp_delta,
        ailment,
        killed,
    })
}

/// Combo counter, hit-stop and rage for a hit that dealt `amount` damage.
fn apply_to_attacker(
    ctx: &mut MatchContext,
    request: &HitRequest,
    amount: f32,
) -> Result<(), CombatError> {
    let now = ctx.clock;
    let hit_stop = ctx.config.ticks(ctx.config.hit_stop_millis);
    let rage_gain = ctx.config.rage_gain_dealt;
    let attacker = ctx.try_agent_mut(request.attacker)?;

    attacker.combo_counter = attacker.combo_counter.saturating_add(1);
    attacker.hit_stop_until = attacker.hit_stop_until.max(now + hit_stop);
    if !attacker.is_raging(now) {
        attacker.vitals.rage.restore(amount * rage_gain);
    }

    ctx.mark_dirty(
        request.attacker,
        ReplicatedFields::COMBO_COUNTER | ReplicatedFields::RAGE,
    );
    Ok(())
}

/// Clears links pointing at `agent`, and the hold it had on `held`.
pub(crate) fn release_grab_links(ctx: &mut MatchContext, agent: AgentId, held: Option<AgentId>) {
    if let Some(held) = held
        && let Some(target) = ctx.agents.get_mut(&held)
        && target.grabbed_by == Some(agent)
    {
        target.grabbed_by = None;
    }
    for other in ctx.agents.values_mut() {
        if other.grab_target == Some(agent) {
            other.grab_target = None;
        }
    }
}

