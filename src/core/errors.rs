//! Error taxonomy for the session core. Every variant is non-fatal: callers log it
//! and the session stays on its current phase.

use crate::app::state::Phase;
use crate::core::components::TargetId;

/// Why the scene collaborator could not place a cloud.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("target pool exhausted")]
    PoolExhausted,
    #[error("placement failed: {0}")]
    Placement(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A mutating call arrived in a phase that does not allow it.
    #[error("cannot {action} while in {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },

    /// `start` requested before the scene reported its assets loaded.
    #[error("game assets are not loaded yet")]
    NotReady,

    #[error("a spawn burst is already in flight")]
    BurstInProgress,

    #[error("spawn failed: {0}")]
    SpawnFailure(#[from] SpawnError),

    #[error("unknown target {0}")]
    UnknownTarget(TargetId),
}
