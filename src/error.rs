//! Error types for tracking and reverting edits.

use thiserror::Error;

/// Errors that can occur while applying steps or reverting commits.
#[derive(Error, Debug)]
pub enum TrackError {
    /// Step range does not fit the document it is applied to.
    #[error("step range {from}..{to} out of bounds for document with length {len}")]
    StepOutOfRange { from: usize, to: usize, len: usize },

    /// Step boundary falls inside a multi-byte character.
    #[error("offset {0} is not on a char boundary")]
    NotCharBoundary(usize),

    /// The commit handed to revert is not part of this history.
    #[error("commit not found in history")]
    CommitNotInHistory,

    /// Revert needs a clean buffer; this many steps are still uncommitted.
    #[error("{0} uncommitted steps must be committed before reverting")]
    UncommittedChanges(usize),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
