//! Canonical error types
//!
//! Every operation in the system returns [`Result`]. Failures propagate to
//! the immediate caller; nothing retries internally.

use thiserror::Error;

/// All revlog errors.
///
/// This is the canonical error type across the storage, engine, and facade
/// layers.
#[derive(Debug, Error)]
pub enum Error {
    /// Log or commit referenced by key does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// A commit already exists at the target revision, or a log id collides
    ///
    /// A commit conflict means the sequencing invariant was bypassed; it is
    /// a hard failure. Retrying the insert without re-incrementing would
    /// leave a revision gap.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Invalid input surfaced immediately, never retried
    #[error("validation: {0}")]
    Validation(String),

    /// Underlying storage failure
    ///
    /// The in-memory backend does not produce these in normal operation,
    /// but the variant is part of the stable contract so backends with real
    /// transient faults slot in. Safe to retry for the increment step only:
    /// a failed increment has not taken effect. An insert must not be
    /// blindly retried; check for the revision first.
    #[error("storage error: {0}")]
    Storage(String),

    /// Bug or invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for revlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is retryable.
    ///
    /// Only transient storage failures qualify, and only on the increment
    /// path; see [`Error::Storage`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a conflict error.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}
