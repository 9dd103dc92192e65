//! Input-sequence driven attack selection.
//!
//! The selector reads the agent's combo history, the current attack phase
//! (derived from animation progress) and the weapon table, and commits the
//! chosen attack's costs on success.

use super::input::InputToken;
use super::state::AttackPhase;
use crate::attack::{AttackDefinition, ComboCondition};
use crate::config::CombatConfig;
use crate::env::{AnimationPlayer, AttackCatalog, ClipId};
use crate::state::{CombatAgent, Tick};

/// Outcome of [`select_attack`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selection<'a> {
    Attack(&'a AttackDefinition),
    /// The chosen attack needs ammo; a reload was started instead.
    ReloadStarted,
    Unavailable,
}

/// Phase of the agent's current attack, `AtRest` if nothing is playing.
pub fn current_phase<C, A>(agent: &CombatAgent, catalog: &C, animation: &A) -> AttackPhase
where
    C: AttackCatalog + ?Sized,
    A: AnimationPlayer + ?Sized,
{
    let Some(attack) = agent.combo.current_attack.and_then(|id| catalog.attack(id)) else {
        return AttackPhase::AtRest;
    };
    if animation.is_at_rest(agent.id) {
        return AttackPhase::AtRest;
    }
    animation
        .normalized_time(agent.id, ClipId::Attack(attack.id))
        .map_or(AttackPhase::AtRest, |progress| attack.phases.phase_at(progress))
}

/// Picks the attack `token` triggers for `agent`, committing history, ammo
/// and stamina on success.
pub fn select_attack<'a, C, A>(
    agent: &mut CombatAgent,
    token: InputToken,
    catalog: &'a C,
    animation: &A,
    config: &CombatConfig,
    now: Tick,
) -> Selection<'a>
where
    C: AttackCatalog + ?Sized,
    A: AnimationPlayer + ?Sized,
{
    if agent.ailment.is_dead() || agent.combo.awaiting_ack || agent.combo.is_reloading() {
        return Selection::Unavailable;
    }

    let phase = current_phase(agent, catalog, animation);
    let current = agent.combo.current_attack.and_then(|id| catalog.attack(id));
    let dodging = phase != AttackPhase::AtRest && current.is_some_and(AttackDefinition::is_dodge);
    let block_reacting =
        agent.blocking && animation.is_playing_clip(agent.id, ClipId::BlockReaction);
    let resting = phase == AttackPhase::AtRest && !agent.ailment.disables_actions();
    let table = catalog.weapon_attacks(agent.weapon);
    let threshold = config.combo_direction_threshold;

    let mut interrupted = false;
    let candidate = if dodging || block_reacting || resting {
        agent.combo.history.clear();
        match_sequence(table, &[], token, agent, threshold)
    } else if phase == AttackPhase::Recovery {
        let chained = if agent.combo.transitioning {
            None
        } else {
            match_sequence(table, agent.combo.history.as_slice(), token, agent, threshold)
        };
        match chained {
            Some(attack) => Some(attack),
            None if current.is_some_and(|attack| attack.cancel.contains(token.cancel_flag())) => {
                interrupted = true;
                match_sequence(table, &[], token, agent, threshold)
            }
            None => None,
        }
    } else {
        None
    };

    let Some(attack) = candidate else {
        return Selection::Unavailable;
    };

    if attack.ammo_cost > 0
        && let Some(ammo) = agent.ammo()
        && ammo.current < attack.ammo_cost
    {
        start_reload(agent, now, config);
        return Selection::ReloadStarted;
    }
    if agent.vitals.stamina.current < attack.stamina_cost {
        return Selection::Unavailable;
    }

    if let Some(ammo) = agent.ammo_mut() {
        ammo.current = ammo.current.saturating_sub(attack.ammo_cost);
    }
    agent.vitals.stamina.drain(attack.stamina_cost);
    if interrupted || attack.flags.resets_history() {
        agent.combo.history.clear();
    }
    if !attack.flags.resets_history() {
        agent.combo.history.push(token);
    }
    agent.combo.current_attack = Some(attack.id);
    agent.charge_millis = 0;
    Selection::Attack(attack)
}

/// Finds the entry completing `history + token`.
///
/// Condition-less entries with a matching aiming requirement win, then
/// directional entries in table order, then the base heavy attack.
fn match_sequence<'a>(
    table: &'a [AttackDefinition],
    history: &[InputToken],
    token: InputToken,
    agent: &CombatAgent,
    threshold: f32,
) -> Option<&'a AttackDefinition> {
    let candidates = || table.iter().filter(move |attack| attack.completes(history, token));

    candidates()
        .find(|attack| {
            attack.condition == ComboCondition::None && attack.must_be_aiming == agent.combo.aiming
        })
        .or_else(|| {
            candidates().find(|attack| {
                attack.condition != ComboCondition::None
                    && attack.condition.is_met(agent.combo.move_input, threshold)
            })
        })
        .or_else(|| {
            if token != InputToken::HeavyAttack {
                return None;
            }
            table.iter().find(|attack| {
                attack.inputs.as_slice() == [InputToken::HeavyAttack]
                    && attack.condition == ComboCondition::None
            })
        })
}

/// Starts a reload unless one is running or there is no magazine to fill.
pub fn start_reload(agent: &mut CombatAgent, now: Tick, config: &CombatConfig) -> bool {
    if agent.combo.is_reloading() || agent.ammo().is_none() {
        return false;
    }
    agent.combo.reload_until = Some(now + config.ticks(config.reload_millis));
    true
}

/// Reloads an empty magazine while the agent stands still.
pub fn auto_reload(agent: &mut CombatAgent, now: Tick, config: &CombatConfig) -> bool {
    let empty = agent.ammo().is_some_and(|ammo| ammo.is_empty());
    if !empty || !agent.combo.move_input.is_zero() || agent.ailment.is_dead() {
        return false;
    }
    start_reload(agent, now, config)
}

/// Refills the magazine once the reload timer has run out.
pub fn finish_reload(agent: &mut CombatAgent, now: Tick) -> bool {
    match agent.combo.reload_until {
        Some(until) if now >= until => {
            agent.combo.reload_until = None;
            if let Some(ammo) = agent.ammo_mut() {
                ammo.current = ammo.capacity;
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ailment::AilmentKind;
    use crate::attack::{AttackFlags, AttackId, AttackTable, CancelFlags, WeaponId};
    use crate::state::{AgentId, AgentStats, MoveInput, TeamId};
    use crate::testing::ScriptedAnimation;
    use InputToken::*;

    const SWORD: WeaponId = WeaponId(1);

    fn table() -> AttackTable {
        AttackTable::new().with_weapon(
            SWORD,
            vec![
                AttackDefinition::new(AttackId(1), "light_1", &[LightAttack], 10.0)
                    .with_cancel(CancelFlags::BY_HEAVY),
                AttackDefinition::new(AttackId(2), "light_1_aimed", &[LightAttack], 8.0).aiming(),
                AttackDefinition::new(AttackId(3), "light_2", &[LightAttack, LightAttack], 12.0),
                AttackDefinition::new(AttackId(4), "heavy", &[HeavyAttack], 20.0)
                    .with_stamina_cost(30.0),
                AttackDefinition::new(AttackId(5), "heavy_lunge", &[HeavyAttack], 25.0)
                    .with_condition(ComboCondition::Forward),
                AttackDefinition::new(AttackId(6), "light_heavy", &[LightAttack, HeavyAttack], 18.0)
                    .with_condition(ComboCondition::Back),
                AttackDefinition::new(AttackId(7), "dodge", &[Dodge], 0.0)
                    .with_flags(AttackFlags::DODGE),
                AttackDefinition::new(AttackId(8), "shot", &[Ability1], 6.0).with_ammo_cost(1),
            ],
        )
    }

    fn agent() -> CombatAgent {
        CombatAgent::player(AgentId(1), TeamId(1), AgentStats::default(), SWORD).with_ammo(2)
    }

    fn select(
        agent: &mut CombatAgent,
        token: InputToken,
        table: &AttackTable,
        animation: &ScriptedAnimation,
    ) -> Option<AttackId> {
        match select_attack(agent, token, table, animation, &CombatConfig::new(), Tick(0)) {
            Selection::Attack(attack) => Some(attack.id),
            _ => None,
        }
    }

    #[test]
    fn light_attack_from_rest_picks_unaimed_entry() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();

        assert_eq!(select(&mut agent, LightAttack, &table, &animation), Some(AttackId(1)));
        assert_eq!(agent.combo.history.as_slice(), &[LightAttack]);
        assert_eq!(agent.combo.current_attack, Some(AttackId(1)));
    }

    #[test]
    fn aiming_prefers_aimed_entry() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        agent.combo.aiming = true;

        assert_eq!(select(&mut agent, LightAttack, &table, &animation), Some(AttackId(2)));
    }

    #[test]
    fn recovery_chains_the_sequence() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        select(&mut agent, LightAttack, &table, &animation);

        animation.play(agent.id, ClipId::Attack(AttackId(1)), 0.8);
        assert_eq!(select(&mut agent, LightAttack, &table, &animation), Some(AttackId(3)));
        assert_eq!(agent.combo.history.as_slice(), &[LightAttack, LightAttack]);
    }

    #[test]
    fn attacking_phase_accepts_nothing() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        select(&mut agent, LightAttack, &table, &animation);

        animation.play(agent.id, ClipId::Attack(AttackId(1)), 0.4);
        assert_eq!(select(&mut agent, LightAttack, &table, &animation), None);
    }

    #[test]
    fn directional_condition_then_heavy_fallback() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        select(&mut agent, LightAttack, &table, &animation);
        animation.play(agent.id, ClipId::Attack(AttackId(1)), 0.8);

        // [Light, Heavy] requires Back; forward input falls back to the base heavy.
        agent.combo.move_input = MoveInput::new(0.0, 0.9);
        assert_eq!(select(&mut agent, HeavyAttack, &table, &animation), Some(AttackId(4)));
        assert_eq!(agent.combo.history.as_slice(), &[LightAttack, HeavyAttack]);
    }

    #[test]
    fn directional_condition_matches_in_table_order() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        select(&mut agent, LightAttack, &table, &animation);
        animation.play(agent.id, ClipId::Attack(AttackId(1)), 0.8);

        agent.combo.move_input = MoveInput::new(0.0, -0.9);
        assert_eq!(select(&mut agent, HeavyAttack, &table, &animation), Some(AttackId(6)));
    }

    #[test]
    fn transitioning_recovery_only_interrupts() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        select(&mut agent, LightAttack, &table, &animation);
        animation.play(agent.id, ClipId::Attack(AttackId(1)), 0.8);
        agent.combo.transitioning = true;

        // Light is not a cancel category of light_1.
        assert_eq!(select(&mut agent, LightAttack, &table, &animation), None);
    }

    #[test]
    fn refused_interrupt_keeps_history() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        select(&mut agent, LightAttack, &table, &animation);
        animation.play(agent.id, ClipId::Attack(AttackId(1)), 0.8);
        agent.combo.transitioning = true;
        agent.vitals.stamina.drain(90.0);

        assert_eq!(select(&mut agent, HeavyAttack, &table, &animation), None);
        assert_eq!(agent.combo.history.as_slice(), &[LightAttack]);

        agent.vitals.stamina.restore(90.0);
        assert_eq!(select(&mut agent, HeavyAttack, &table, &animation), Some(AttackId(4)));
        assert_eq!(agent.combo.history.as_slice(), &[HeavyAttack]);
    }

    #[test]
    fn dodge_clears_history() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        select(&mut agent, LightAttack, &table, &animation);

        assert_eq!(select(&mut agent, Dodge, &table, &animation), Some(AttackId(7)));
        assert!(agent.combo.history.is_empty());

        // Mid-dodge, the next input starts a fresh sequence.
        animation.play(agent.id, ClipId::Attack(AttackId(7)), 0.3);
        assert_eq!(select(&mut agent, LightAttack, &table, &animation), Some(AttackId(1)));
    }

    #[test]
    fn ailment_blocks_selection_at_rest() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        agent.ailment = AilmentKind::Stun;

        assert_eq!(select(&mut agent, LightAttack, &table, &animation), None);
    }

    #[test]
    fn awaiting_ack_or_reloading_rejects() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        agent.combo.awaiting_ack = true;
        assert_eq!(select(&mut agent, LightAttack, &table, &animation), None);

        agent.combo.awaiting_ack = false;
        agent.combo.reload_until = Some(Tick(10));
        assert_eq!(select(&mut agent, LightAttack, &table, &animation), None);
    }

    #[test]
    fn missing_ammo_starts_reload() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();
        agent.ammo_mut().unwrap().current = 0;

        let selection =
            select_attack(&mut agent, Ability1, &table, &animation, &CombatConfig::new(), Tick(0));
        assert_eq!(selection, Selection::ReloadStarted);
        assert!(agent.combo.is_reloading());
    }

    #[test]
    fn ranged_attack_spends_ammo() {
        let table = table();
        let animation = ScriptedAnimation::default();
        let mut agent = agent();

        assert_eq!(select(&mut agent, Ability1, &table, &animation), Some(AttackId(8)));
        assert_eq!(agent.ammo().map(|ammo| ammo.current), Some(1));
    }

    #[test]
    fn auto_reload_waits_for_zero_move_input() {
        let config = CombatConfig::new();
        let mut agent = agent();
        agent.ammo_mut().unwrap().current = 0;
        agent.combo.move_input = MoveInput::new(0.3, 0.0);

        assert!(!auto_reload(&mut agent, Tick(1), &config));
        assert!(!agent.combo.is_reloading());

        agent.combo.move_input = MoveInput::ZERO;
        assert!(auto_reload(&mut agent, Tick(2), &config));

        let done = Tick(2) + config.ticks(config.reload_millis);
        assert!(!finish_reload(&mut agent, Tick(3)));
        assert!(finish_reload(&mut agent, done));
        assert_eq!(agent.ammo().map(|ammo| ammo.current), Some(2));
    }
}
