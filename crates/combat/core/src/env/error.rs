//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors raised when a required oracle is missing from the environment.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("AttackCatalog not available")]
    CatalogNotAvailable,

    #[error("AnimationPlayer not available")]
    AnimationNotAvailable,

    #[error("TeamRules not available")]
    RulesNotAvailable,
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        // The engine cannot resolve anything without its oracles.
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            CatalogNotAvailable => "ORACLE_CATALOG_NOT_AVAILABLE",
            AnimationNotAvailable => "ORACLE_ANIMATION_NOT_AVAILABLE",
            RulesNotAvailable => "ORACLE_RULES_NOT_AVAILABLE",
        }
    }
}
