//! Engine error taxonomy
//!
//! Validation and policy errors are raised before any write; `Busy` is the
//! retryable signal surfaced after the bounded conflict-retry loop gives up.

use thiserror::Error;
use ulid::Ulid;

use super::model::TargetKind;

/// Errors produced by the reputation engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Vote value other than +1 or -1
    #[error("invalid vote value {0}: must be +1 or -1")]
    InvalidVoteValue(i64),

    /// Author voting on their own content
    #[error("you cannot vote on your own {0}")]
    SelfVoteForbidden(TargetKind),

    /// Vote target does not exist (or exists under a different kind)
    #[error("{kind} {id} not found")]
    TargetNotFound { kind: TargetKind, id: Ulid },

    /// Referenced user does not exist
    #[error("user {0} not found")]
    UserNotFound(Ulid),

    /// Referenced community does not exist
    #[error("community {0} not found")]
    CommunityNotFound(Ulid),

    /// Transaction kept conflicting after the configured number of attempts.
    /// Safe to retry: the failed operation left no partial state.
    #[error("operation contended after {0} attempts, retry later")]
    Busy(u32),

    /// Underlying storage failure
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Whether the caller may retry the operation as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Busy(_))
    }
}
