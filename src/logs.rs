//! Log lifecycle and per-log operations.

use revlog_core::{Commit, Error, LogId, LogRecord, Result, Revision, RevisionRange};
use revlog_engine::Database;
use serde::Serialize;
use std::sync::Arc;

/// Log lifecycle operations.
///
/// Access via `db.logs`.
pub struct Logs {
    db: Arc<Database>,
}

impl Logs {
    pub(crate) fn new(db: Arc<Database>) -> Self {
        Logs { db }
    }

    /// Create a log with a generated id.
    pub fn create(&self) -> Result<LogHandle> {
        let record = self.db.create_log(None)?;
        Ok(LogHandle::new(Arc::clone(&self.db), record.id))
    }

    /// Create a log under a caller-assigned id.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a log already exists under this id
    pub fn create_with_id(&self, id: impl Into<LogId>) -> Result<LogHandle> {
        let record = self.db.create_log(Some(id.into()))?;
        Ok(LogHandle::new(Arc::clone(&self.db), record.id))
    }

    /// Get a handle to an existing log.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the log does not exist
    pub fn get(&self, id: impl Into<LogId>) -> Result<LogHandle> {
        let id = id.into();
        self.db.log(&id)?;
        Ok(LogHandle::new(Arc::clone(&self.db), id))
    }

    /// Check if a log exists.
    pub fn exists(&self, id: impl Into<LogId>) -> bool {
        self.db.log_exists(&id.into())
    }

    /// Ids of all logs.
    pub fn ids(&self) -> Vec<LogId> {
        self.db.log_ids()
    }

    /// Number of logs.
    pub fn count(&self) -> usize {
        self.db.log_count()
    }
}

/// Operations on one log.
///
/// Handles are cheap to clone and safe to share across threads; every
/// operation reads current state from the engine.
#[derive(Clone)]
pub struct LogHandle {
    db: Arc<Database>,
    id: LogId,
}

impl LogHandle {
    pub(crate) fn new(db: Arc<Database>, id: LogId) -> Self {
        LogHandle { db, id }
    }

    /// This log's id.
    pub fn id(&self) -> &LogId {
        &self.id
    }

    /// The log's current record.
    pub fn record(&self) -> Result<LogRecord> {
        self.db.log(&self.id)
    }

    /// High-water mark of assigned revisions, `None` before the first commit.
    pub fn latest_revision(&self) -> Result<Option<Revision>> {
        Ok(self.record()?.latest_revision)
    }

    /// Consumer watermark, `None` until first set.
    pub fn applied_revision(&self) -> Result<Option<Revision>> {
        Ok(self.record()?.applied_revision)
    }

    // =========================================================================
    // Write path
    // =========================================================================

    /// Append a commit carrying any serializable payload.
    ///
    /// The payload is normalized to its JSON byte form before storage.
    /// Structure is discarded at that point; readers get bytes back and
    /// re-parse as needed.
    ///
    /// # Example
    ///
    /// ```
    /// use revlog::prelude::*;
    ///
    /// # fn main() -> revlog::Result<()> {
    /// let db = RevLog::new();
    /// let log = db.logs.create()?;
    /// let commit = log.new_commit(&serde_json::json!({"action": "login"}))?;
    /// assert_eq!(commit.revision, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new_commit<T: Serialize + ?Sized>(&self, data: &T) -> Result<Commit> {
        let payload = serde_json::to_vec(data)
            .map_err(|e| Error::Validation(format!("unserializable payload: {}", e)))?;
        self.db.new_commit(&self.id, payload)
    }

    /// Append a commit carrying raw bytes.
    pub fn new_commit_bytes(&self, data: impl Into<Vec<u8>>) -> Result<Commit> {
        self.db.new_commit(&self.id, data.into())
    }

    /// Reserve `count` contiguous revisions for out-of-band writes.
    pub fn allocate_revisions(&self, count: u64) -> Result<RevisionRange> {
        self.db.allocate_revisions(&self.id, count)
    }

    /// Mark the commit at `revision` as applied.
    ///
    /// One-way and idempotent; exposed for the downstream consumer.
    pub fn mark_applied(&self, revision: Revision) -> Result<Commit> {
        self.db.mark_applied(&self.id, revision)
    }

    /// Advance the consumer watermark.
    ///
    /// # Errors
    ///
    /// - `Validation` if `revision` exceeds the high-water mark or moves
    ///   the watermark backwards
    pub fn set_applied_revision(&self, revision: Revision) -> Result<()> {
        self.db.set_applied_revision(&self.id, revision)
    }

    // =========================================================================
    // Read path
    // =========================================================================

    /// All commits up to the high-water mark, ascending by revision.
    pub fn commits(&self) -> Result<Vec<Commit>> {
        self.db.commits(&self.id)
    }

    /// Assigned revision numbers, ascending.
    pub fn revisions(&self) -> Result<Vec<Revision>> {
        self.db.revisions(&self.id)
    }

    /// Commits with `bottom <= revision <= top` and the given applied flag.
    pub fn commit_range(
        &self,
        bottom: Revision,
        top: Revision,
        applied: bool,
    ) -> Result<Vec<Commit>> {
        self.db.commit_range(&self.id, bottom, top, applied)
    }

    /// Unapplied commits at or above the consumer watermark.
    pub fn uncommitted(&self) -> Result<Vec<Commit>> {
        self.db.uncommitted(&self.id)
    }

    /// The commit at `revision`, or `None` if it was never written.
    pub fn commit(&self, revision: Revision) -> Result<Option<Commit>> {
        self.db.commit(&self.id, revision)
    }
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle").field("id", &self.id).finish()
    }
}
