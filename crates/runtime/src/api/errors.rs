//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading and the combat
//! rules so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::CombatError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("runtime requires oracles to be configured before building")]
    MissingOracles,

    #[error("failed to load combat content: {0:#}")]
    Content(anyhow::Error),

    #[error(transparent)]
    Combat(#[from] CombatError),
}
