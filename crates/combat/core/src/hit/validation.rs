//! Hit validity checks, in order. The first failing check wins.

use super::request::{HitDelivery, HitRejection};
use crate::attack::{AttackDefinition, HitCounter};
use crate::config::CombatConfig;
use crate::env::TeamRules;
use crate::state::{Combatant, Tick};

/// A hit that passed every check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidHit {
    /// The victim gets marked as staggered on this tick.
    pub interrupts_victim: bool,
}

#[allow(clippy::too_many_arguments)]
pub fn check<A, V, R>(
    attacker: &A,
    victim: &V,
    attack: &AttackDefinition,
    counter: &HitCounter,
    rules: &R,
    delivery: HitDelivery,
    now: Tick,
    config: &CombatConfig,
) -> Result<ValidHit, HitRejection>
where
    A: Combatant + ?Sized,
    V: Combatant + ?Sized,
    R: TeamRules + ?Sized,
{
    if attacker.is_dead() {
        return Err(HitRejection::AttackerDead);
    }
    if victim.is_dead() {
        return Err(HitRejection::VictimDead);
    }

    if attacker.is_in_hit_stop(now) {
        return Err(HitRejection::AttackerInHitStop);
    }

    let held_elsewhere = victim
        .grabbed_by()
        .is_some_and(|holder| holder != attacker.id());
    let grabbing_other = attacker
        .grab_target()
        .is_some_and(|target| target != victim.id());
    if held_elsewhere || grabbing_other {
        return Err(HitRejection::GrabConflict);
    }

    if !rules.can_hit(attacker.team(), victim.team()) {
        return Err(HitRejection::FriendlyFire);
    }

    if attack.hit_limit == 0 {
        return Err(HitRejection::HitLimitZero);
    }
    let min_interval = config.ticks(attack.min_hit_interval_millis);
    if !counter.allows(victim.id(), now, attack.hit_limit, min_interval) {
        return Err(HitRejection::RepeatHitGated);
    }

    if victim.is_invincible(now) {
        return Err(HitRejection::Invincible);
    }

    let interrupts_victim = match delivery {
        HitDelivery::Melee => {
            if attacker.was_staggered_at(now) {
                return Err(HitRejection::AttackerStaggered);
            }
            !victim.is_uninterruptable(now)
        }
        HitDelivery::Projectile => false,
    };

    Ok(ValidHit { interrupts_victim })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ailment::AilmentKind;
    use crate::attack::{AttackId, WeaponId};
    use crate::combo::InputToken;
    use crate::env::Ruleset;
    use crate::state::{AgentId, AgentStats, CombatAgent, TeamId};

    fn agents() -> (CombatAgent, CombatAgent) {
        let stats = AgentStats::default();
        (
            CombatAgent::player(AgentId(1), TeamId(1), stats, WeaponId(1)),
            CombatAgent::player(AgentId(2), TeamId(2), stats, WeaponId(1)),
        )
    }

    fn attack() -> AttackDefinition {
        AttackDefinition::new(AttackId(1), "jab", &[InputToken::LightAttack], 10.0)
    }

    fn run(
        attacker: &CombatAgent,
        victim: &CombatAgent,
        attack: &AttackDefinition,
        counter: &HitCounter,
        delivery: HitDelivery,
    ) -> Result<ValidHit, HitRejection> {
        check(
            attacker,
            victim,
            attack,
            counter,
            &Ruleset::Teams,
            delivery,
            Tick(10),
            &CombatConfig::new(),
        )
    }

    #[test]
    fn clean_melee_hit_interrupts() {
        let (attacker, victim) = agents();
        let counter = HitCounter::for_attack(attacker.id, AttackId(1));
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Ok(ValidHit { interrupts_victim: true })
        );
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Projectile),
            Ok(ValidHit { interrupts_victim: false })
        );
    }

    #[test]
    fn dead_agents_cannot_trade_hits() {
        let (mut attacker, mut victim) = agents();
        let counter = HitCounter::new(attacker.id);
        victim.ailment = AilmentKind::Death;
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::VictimDead)
        );
        attacker.ailment = AilmentKind::Death;
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::AttackerDead)
        );
    }

    #[test]
    fn hit_stop_precedes_grab_conflict() {
        let (mut attacker, mut victim) = agents();
        let counter = HitCounter::new(attacker.id);
        attacker.hit_stop_until = Tick(11);
        victim.grabbed_by = Some(AgentId(3));
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::AttackerInHitStop)
        );

        // The window is exclusive of its end tick.
        attacker.hit_stop_until = Tick(10);
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::GrabConflict)
        );
    }

    #[test]
    fn grab_links_restrict_targets() {
        let (attacker, mut victim) = agents();
        let counter = HitCounter::new(attacker.id);
        victim.grabbed_by = Some(AgentId(3));
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::GrabConflict)
        );

        victim.grabbed_by = Some(attacker.id);
        assert!(run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee).is_ok());
    }

    #[test]
    fn team_check_precedes_hit_limit() {
        let (attacker, mut victim) = agents();
        victim.team = attacker.team;
        let counter = HitCounter::new(attacker.id);
        let attack = attack().with_hit_limit(0);
        assert_eq!(
            run(&attacker, &victim, &attack, &counter, HitDelivery::Melee),
            Err(HitRejection::FriendlyFire)
        );
    }

    #[test]
    fn hit_limit_precedes_invincibility() {
        let (attacker, mut victim) = agents();
        victim.invincible_until = Tick(100);
        let counter = HitCounter::new(attacker.id);
        assert_eq!(
            run(&attacker, &victim, &attack().with_hit_limit(0), &counter, HitDelivery::Melee),
            Err(HitRejection::HitLimitZero)
        );
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::Invincible)
        );
    }

    #[test]
    fn repeat_hits_are_gated() {
        let (attacker, victim) = agents();
        let mut counter = HitCounter::for_attack(attacker.id, AttackId(1));
        counter.register(victim.id, Tick(9));
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::RepeatHitGated)
        );
    }

    #[test]
    fn staggered_attacker_cannot_land_melee() {
        let (mut attacker, mut victim) = agents();
        let counter = HitCounter::new(attacker.id);
        attacker.staggered_at = Some(Tick(10));
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Err(HitRejection::AttackerStaggered)
        );
        // Projectiles already in flight still land.
        assert!(run(&attacker, &victim, &attack(), &counter, HitDelivery::Projectile).is_ok());

        attacker.staggered_at = None;
        victim.grant_uninterruptable(Tick(10), 10);
        assert_eq!(
            run(&attacker, &victim, &attack(), &counter, HitDelivery::Melee),
            Ok(ValidHit { interrupts_victim: false })
        );
    }
}
