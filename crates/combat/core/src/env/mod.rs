//! Traits describing read-only data the combat rules consult.
//!
//! Oracles expose attack tables, animation state, and team rules. The [`Env`]
//! aggregate bundles them so the engine can access everything it needs
//! without hard coupling to concrete implementations.
mod animation;
mod catalog;
mod error;
mod rules;

pub use animation::{AnimationPlayer, ClipId};
pub use catalog::AttackCatalog;
pub use error::OracleError;
pub use rules::{Ruleset, TeamRules};

/// Aggregates read-only oracles required by the combat rules.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, C, A, R>
where
    C: AttackCatalog + ?Sized,
    A: AnimationPlayer + ?Sized,
    R: TeamRules + ?Sized,
{
    catalog: Option<&'a C>,
    animation: Option<&'a A>,
    rules: Option<&'a R>,
}

pub type CombatEnv<'a> =
    Env<'a, dyn AttackCatalog + 'a, dyn AnimationPlayer + 'a, dyn TeamRules + 'a>;

impl<'a, C, A, R> Env<'a, C, A, R>
where
    C: AttackCatalog + ?Sized,
    A: AnimationPlayer + ?Sized,
    R: TeamRules + ?Sized,
{
    pub fn new(catalog: Option<&'a C>, animation: Option<&'a A>, rules: Option<&'a R>) -> Self {
        Self {
            catalog,
            animation,
            rules,
        }
    }

    pub fn with_all(catalog: &'a C, animation: &'a A, rules: &'a R) -> Self {
        Self::new(Some(catalog), Some(animation), Some(rules))
    }

    pub fn empty() -> Self {
        Self {
            catalog: None,
            animation: None,
            rules: None,
        }
    }

    /// Returns the AttackCatalog, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::CatalogNotAvailable` if no catalog was provided.
    pub fn catalog(&self) -> Result<&'a C, OracleError> {
        self.catalog.ok_or(OracleError::CatalogNotAvailable)
    }

    /// Returns the AnimationPlayer, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::AnimationNotAvailable` if no animation oracle was provided.
    pub fn animation(&self) -> Result<&'a A, OracleError> {
        self.animation.ok_or(OracleError::AnimationNotAvailable)
    }

    /// Returns the TeamRules, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RulesNotAvailable` if no rules oracle was provided.
    pub fn rules(&self) -> Result<&'a R, OracleError> {
        self.rules.ok_or(OracleError::RulesNotAvailable)
    }
}

impl<'a, C, A, R> Env<'a, C, A, R>
where
    C: AttackCatalog + 'a,
    A: AnimationPlayer + 'a,
    R: TeamRules + 'a,
{
    /// Converts this environment into a trait-object based `CombatEnv`.
    pub fn into_combat_env(self) -> CombatEnv<'a> {
        let catalog: Option<&'a dyn AttackCatalog> = self.catalog.map(|catalog| catalog as _);
        let animation: Option<&'a dyn AnimationPlayer> =
            self.animation.map(|animation| animation as _);
        let rules: Option<&'a dyn TeamRules> = self.rules.map(|rules| rules as _);
        Env::new(catalog, animation, rules)
    }
}
