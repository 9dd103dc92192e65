use crate::state::TeamId;

/// Match ruleset deciding who may damage whom.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ruleset {
    /// Every agent may hit every other agent.
    Competitor,
    /// Teammates cannot damage each other.
    #[default]
    Teams,
}

pub trait TeamRules: Send + Sync {
    fn ruleset(&self) -> Ruleset;

    /// Whether an attacker on `attacker` may damage a victim on `victim`.
    fn can_hit(&self, attacker: TeamId, victim: TeamId) -> bool {
        match self.ruleset() {
            Ruleset::Competitor => true,
            Ruleset::Teams => attacker != victim,
        }
    }
}

impl TeamRules for Ruleset {
    fn ruleset(&self) -> Ruleset {
        *self
    }
}
