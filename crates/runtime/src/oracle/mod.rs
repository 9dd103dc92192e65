//! Runtime wrappers around combat content and host state oracles.
//!
//! These implementations expose `combat-core` oracle traits and bundle them
//! into an [`OracleBundle`] so the worker can build [`combat_core::Env`]
//! snapshots on demand. Attack tables and team rules are immutable at
//! runtime; the animation mirror is written by the host between steps.
mod animation;
mod catalog;

use std::sync::Arc;

use combat_core::{CombatEnv, Env, Ruleset};

pub use animation::AnimationMirror;
pub use catalog::AttackCatalogImpl;

/// Shares every oracle the combat rules consult.
#[derive(Clone)]
pub struct OracleBundle {
    pub(crate) catalog: Arc<AttackCatalogImpl>,
    pub(crate) animation: Arc<AnimationMirror>,
    pub(crate) rules: Ruleset,
}

impl OracleBundle {
    pub fn new(catalog: AttackCatalogImpl, animation: Arc<AnimationMirror>, rules: Ruleset) -> Self {
        Self {
            catalog: Arc::new(catalog),
            animation,
            rules,
        }
    }

    /// Converts the bundle into the environment consumed by combat-core
    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        Env::with_all(self.catalog.as_ref(), self.animation.as_ref(), &self.rules)
            .into_combat_env()
    }

    pub fn catalog(&self) -> &AttackCatalogImpl {
        &self.catalog
    }

    /// Shared animation mirror, for the host's animation system to update.
    pub fn animation(&self) -> Arc<AnimationMirror> {
        Arc::clone(&self.animation)
    }

    pub fn rules(&self) -> Ruleset {
        self.rules
    }
}
