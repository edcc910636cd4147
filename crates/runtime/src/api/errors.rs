//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from battle setup, provider plumbing and the battle task so
//! clients can bubble them up with consistent context. Rejected actions are
//! not errors here; the battle loop retries or passes the turn instead.
use std::fmt;

use combat_core::{EngineError, SetupError};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::providers::ai::Behavior;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} action provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("action provider channel closed")]
    ActionProviderChannelClosed,

    #[error("action reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle task join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Which provider instance answers for an entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// External input (human player, network peer).
    Interactive,
    /// AI decision engine running the given behavior.
    Ai(Behavior),
    /// Pre-recorded actions, mostly for tests and replays.
    Scripted,
    /// Always passes.
    Pass,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Interactive => write!(f, "interactive"),
            ProviderKind::Ai(behavior) => write!(f, "ai({})", behavior),
            ProviderKind::Scripted => write!(f, "scripted"),
            ProviderKind::Pass => write!(f, "pass"),
        }
    }
}
