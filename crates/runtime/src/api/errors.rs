//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and content loading so clients
//! can bubble them up with consistent context. Gameplay outcomes (a gated
//! activation, an immune target) are never errors; they show up only as
//! missing events.
use std::path::PathBuf;

use thiserror::Error;
use tokio::sync::oneshot;

use gameplay_core::EntityId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    #[error("step size must be positive and finite, got {0}")]
    InvalidStep(f32),

    #[error("failed to load gameplay content from {}: {message}", path.display())]
    Content { path: PathBuf, message: String },
}

impl RuntimeError {
    pub(crate) fn content(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        Self::Content {
            path: path.into(),
            message: format!("{error:#}"),
        }
    }
}
