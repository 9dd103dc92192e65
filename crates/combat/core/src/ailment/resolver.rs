//! Combination table for stacking ailments.
//!
//! Rows are checked in order: combinations first, then overrides keyed on
//! the attack that landed, then the pass-through default. Death is absorbing.

use super::kind::AilmentKind;
use super::kind::AilmentKind::{Knockdown, Knockup, Stagger, Stun};

/// Attack property that re-applies or overrides the current ailment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Override {
    FollowUp,
    FlashClip,
}

/// Outcome of combining the victim's ailment with an incoming one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub ailment: AilmentKind,
    /// Transition even if `ailment` equals the current one.
    pub forced: bool,
    /// Override row that produced this resolution.
    pub trigger: Option<Override>,
}

impl Resolution {
    const fn plain(ailment: AilmentKind) -> Self {
        Self {
            ailment,
            forced: false,
            trigger: None,
        }
    }
}

const COMBINATIONS: [(AilmentKind, AilmentKind, AilmentKind); 5] = [
    (Stun, Stun, Knockdown),
    (Stun, Stagger, Knockup),
    (Stagger, Stagger, Knockdown),
    (Knockup, Stun, Knockdown),
    (Knockup, Stagger, Knockdown),
];

const OVERRIDES: [(AilmentKind, Override, AilmentKind); 3] = [
    (Stun, Override::FollowUp, Stagger),
    (Knockup, Override::FlashClip, Knockup),
    (Knockup, Override::FollowUp, Knockup),
];

/// Combines the victim's `current` ailment with the `incoming` one from an
/// attack.
pub fn resolve(
    current: AilmentKind,
    incoming: AilmentKind,
    follow_up: bool,
    flash_clip: bool,
) -> Resolution {
    if current.is_dead() {
        return Resolution::plain(AilmentKind::Death);
    }

    if let Some(&(_, _, result)) = COMBINATIONS
        .iter()
        .find(|(from, with, _)| *from == current && *with == incoming)
    {
        return Resolution::plain(result);
    }

    let applies = |trigger: Override| match trigger {
        Override::FollowUp => follow_up,
        Override::FlashClip => flash_clip,
    };
    if let Some(&(_, trigger, result)) = OVERRIDES
        .iter()
        .find(|(from, trigger, _)| *from == current && applies(*trigger))
    {
        return Resolution {
            ailment: result,
            forced: true,
            trigger: Some(trigger),
        };
    }

    match incoming {
        AilmentKind::None if matches!(current, Stun | Stagger) => {
            Resolution::plain(AilmentKind::None)
        }
        AilmentKind::None => Resolution::plain(current),
        incoming => Resolution::plain(incoming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AilmentKind::*;
    use strum::IntoEnumIterator;

    #[test]
    fn combination_rows() {
        assert_eq!(resolve(Stun, Stun, false, false).ailment, Knockdown);
        assert_eq!(resolve(Stun, Stagger, false, false).ailment, Knockup);
        assert_eq!(resolve(Stagger, Stagger, false, false).ailment, Knockdown);
        assert_eq!(resolve(Knockup, Stun, false, false).ailment, Knockdown);
        assert_eq!(resolve(Knockup, Stagger, false, false).ailment, Knockdown);
    }

    #[test]
    fn combinations_take_precedence_over_overrides() {
        let resolution = resolve(Stun, Stun, true, false);
        assert_eq!(resolution.ailment, Knockdown);
        assert!(!resolution.forced);
    }

    #[test]
    fn follow_up_forces_stagger_out_of_stun() {
        let resolution = resolve(Stun, None, true, false);
        assert_eq!(resolution.ailment, Stagger);
        assert!(resolution.forced);
        assert_eq!(resolution.trigger, Some(Override::FollowUp));
    }

    #[test]
    fn flash_reapplies_knockup_before_follow_up() {
        let resolution = resolve(Knockup, None, true, true);
        assert_eq!(resolution.ailment, Knockup);
        assert!(resolution.forced);
        assert_eq!(resolution.trigger, Some(Override::FlashClip));

        let follow_up = resolve(Knockup, Pull, true, false);
        assert_eq!(follow_up.trigger, Some(Override::FollowUp));
    }

    #[test]
    fn no_ailment_clears_stun_and_stagger_only() {
        assert_eq!(resolve(Stun, None, false, false).ailment, None);
        assert_eq!(resolve(Stagger, None, false, false).ailment, None);
        assert_eq!(resolve(Knockdown, None, false, false).ailment, Knockdown);
        assert_eq!(resolve(None, None, false, false).ailment, None);
    }

    #[test]
    fn unlisted_pairs_pass_incoming_through() {
        assert_eq!(resolve(None, Stun, false, false).ailment, Stun);
        assert_eq!(resolve(Knockdown, Pull, false, false).ailment, Pull);
        assert_eq!(resolve(Stagger, Stun, false, false).ailment, Stun);
    }

    #[test]
    fn death_is_absorbing() {
        for incoming in AilmentKind::iter() {
            for (follow_up, flash) in [(false, false), (true, false), (false, true), (true, true)] {
                let resolution = resolve(Death, incoming, follow_up, flash);
                assert_eq!(resolution.ailment, Death);
                assert!(!resolution.forced);
            }
        }
    }
}
