//! Common error infrastructure for combat-core.
//!
//! Invariant violations (calling server-only code off the authoritative node,
//! foreign hit counters, unknown agents) are [`CombatError`]s. Public
//! operations log them and return `false`/`None` without mutating anything, so
//! a dropped call corrects itself on the next simulation step. Expected
//! rejections such as invincibility or team restrictions are not errors at all;
//! see [`crate::hit::HitRejection`].

use crate::attack::AttackId;
use crate::env::OracleError;
use crate::state::{AgentId, Tick};
use crate::status::ConditionalHandle;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same call may succeed on a later step.
    Recoverable,

    /// Invalid input, should not retry without changes.
    Validation,

    /// Unexpected state inconsistency. These indicate bugs.
    Internal,

    /// Match state cannot be trusted anymore.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorContext {
    /// Agent that triggered the error (if applicable).
    pub agent: Option<AgentId>,

    /// Simulation tick at the time of error.
    pub tick: Tick,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(tick: Tick) -> Self {
        Self {
            agent: None,
            tick,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_agent(mut self, agent: AgentId) -> Self {
        self.agent = Some(agent);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all combat-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Invariant violations raised by the combat rules.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// A server-only operation ran on a node without authority.
    #[error("{operation} requires the authoritative node")]
    NotAuthoritative { operation: &'static str },

    #[error("agent {0} is not registered in this match")]
    UnknownAgent(AgentId),

    #[error("agent {0} is already registered in this match")]
    DuplicateAgent(AgentId),

    #[error("attack {0} is not in the catalog")]
    UnknownAttack(AttackId),

    #[error("agent {0} cannot hit itself")]
    SelfHit(AgentId),

    /// The hit counter belongs to a different attacker's attack instance.
    #[error("hit counter owned by {owner} used for attacker {attacker}")]
    ForeignHitCounter { owner: AgentId, attacker: AgentId },

    #[error("conditional status handle {0:?} is not registered")]
    UnknownConditionalHandle(ConditionalHandle),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl CombatError {
    /// Agent the violation concerns, when the error names one.
    pub fn agent(&self) -> Option<AgentId> {
        use CombatError::*;
        match self {
            UnknownAgent(id) | DuplicateAgent(id) | SelfHit(id) => Some(*id),
            ForeignHitCounter { attacker, .. } => Some(*attacker),
            NotAuthoritative { .. }
            | UnknownAttack(_)
            | UnknownConditionalHandle(_)
            | Oracle(_) => None,
        }
    }

    /// Diagnostic context for this error raised by `operation` at `tick`.
    pub fn context(&self, tick: Tick, operation: &'static str) -> ErrorContext {
        let context = ErrorContext::new(tick).with_message(operation);
        match self.agent() {
            Some(agent) => context.with_agent(agent),
            None => context,
        }
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        use CombatError::*;
        match self {
            NotAuthoritative { .. } => ErrorSeverity::Validation,
            UnknownAgent(_) | UnknownAttack(_) | SelfHit(_) => ErrorSeverity::Validation,
            DuplicateAgent(_) => ErrorSeverity::Validation,
            ForeignHitCounter { .. } | UnknownConditionalHandle(_) => ErrorSeverity::Internal,
            Oracle(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            NotAuthoritative { .. } => "COMBAT_NOT_AUTHORITATIVE",
            UnknownAgent(_) => "COMBAT_UNKNOWN_AGENT",
            DuplicateAgent(_) => "COMBAT_DUPLICATE_AGENT",
            UnknownAttack(_) => "COMBAT_UNKNOWN_ATTACK",
            SelfHit(_) => "COMBAT_SELF_HIT",
            ForeignHitCounter { .. } => "COMBAT_FOREIGN_HIT_COUNTER",
            UnknownConditionalHandle(_) => "COMBAT_UNKNOWN_CONDITIONAL_HANDLE",
            Oracle(error) => error.error_code(),
        }
    }
}
