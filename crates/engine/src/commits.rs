//! Commit persistence and queries
//!
//! Commits are written once at an allocated revision and never move. The
//! store defends the (parent, revision) uniqueness invariant even though a
//! correctly sequenced writer can never violate it.

use revlog_core::{Commit, LogId, Result, Revision};
use revlog_storage::{CommitQuery, ShardedStore};
use std::sync::Arc;

/// Persists commit records and answers ordered, filtered queries
pub struct CommitStore {
    store: Arc<ShardedStore>,
}

impl CommitStore {
    /// Create a commit store over `store`
    pub fn new(store: Arc<ShardedStore>) -> Self {
        CommitStore { store }
    }

    /// Persist a new commit at `revision` of `log_id`
    ///
    /// Builds the record with `applied = false`, both parent references
    /// set, and fresh timestamps.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the parent log does not exist
    /// - `Conflict` if a commit already exists at this revision; the
    ///   stored commit is left untouched and the caller must not retry
    ///   without allocating a new revision
    pub fn insert(&self, log_id: &LogId, revision: Revision, data: Vec<u8>) -> Result<Commit> {
        let commit = Commit::new(log_id.clone(), revision, data);
        self.store.insert_commit(commit)
    }

    /// Read the commit at `revision` of `log_id`, if one was ever written
    ///
    /// `Ok(None)` for an allocated-but-never-written revision; that is how
    /// callers detect a sequencing gap.
    pub fn get(&self, log_id: &LogId, revision: Revision) -> Result<Option<Commit>> {
        self.store.get_commit(log_id, revision)
    }

    /// Scan `log_id`'s commits ascending by revision
    pub fn scan(&self, log_id: &LogId, query: CommitQuery) -> Result<Vec<Commit>> {
        self.store.scan_commits(log_id, &query)
    }

    /// Mark the commit at `revision` as applied
    ///
    /// One-way transition, idempotent on repeat.
    pub fn mark_applied(&self, log_id: &LogId, revision: Revision) -> Result<Commit> {
        let commit = self.store.mark_applied(log_id, revision)?;
        tracing::debug!(log = %log_id, revision, "commit applied");
        Ok(commit)
    }
}
