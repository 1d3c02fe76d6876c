//! Orchestration over the counter and commit store
//!
//! `Database` owns one shared store and composes the two leaf components
//! into the public write and read paths. The write path is deliberately
//! two-step and non-transactional: the revision allocation commits first,
//! then the commit record is written. A crash between the steps leaves an
//! allocated revision with no commit, observable through `commit()` and
//! range queries. Sequencing stays cheap and independent of payload
//! persistence in exchange.

use crate::commits::CommitStore;
use crate::counter::RevisionCounter;
use revlog_core::{Commit, Error, LogId, LogRecord, QueryLimits, Result, Revision, RevisionRange};
use revlog_storage::{CommitQuery, ShardedStore};
use std::sync::Arc;

/// The revlog engine
///
/// Composes [`RevisionCounter`] and [`CommitStore`] over one
/// [`ShardedStore`] and exposes log lifecycle plus the derived queries.
pub struct Database {
    store: Arc<ShardedStore>,
    counter: RevisionCounter,
    commits: CommitStore,
    limits: QueryLimits,
}

impl Database {
    /// Create an engine with default query limits
    pub fn new() -> Self {
        Self::with_limits(QueryLimits::default())
    }

    /// Create an engine with explicit query limits
    pub fn with_limits(limits: QueryLimits) -> Self {
        let store = Arc::new(ShardedStore::new());
        Database {
            counter: RevisionCounter::new(Arc::clone(&store)),
            commits: CommitStore::new(Arc::clone(&store)),
            store,
            limits,
        }
    }

    /// The configured query limits
    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    // ========================================================================
    // Log lifecycle
    // ========================================================================

    /// Create a log, generating an id when none is given
    ///
    /// # Errors
    ///
    /// - `Conflict` if a log already exists under the given id
    pub fn create_log(&self, id: Option<LogId>) -> Result<LogRecord> {
        let id = id.unwrap_or_else(LogId::generate);
        let record = LogRecord::new(id.clone());
        self.store.create_log(record.clone())?;
        tracing::debug!(log = %id, "log created");
        Ok(record)
    }

    /// Read a log's record
    ///
    /// # Errors
    ///
    /// - `NotFound` if the log does not exist
    pub fn log(&self, id: &LogId) -> Result<LogRecord> {
        self.store
            .get_log(id)
            .ok_or_else(|| Error::NotFound(format!("log {}", id)))
    }

    /// Check if a log exists
    pub fn log_exists(&self, id: &LogId) -> bool {
        self.store.has_log(id)
    }

    /// Ids of all logs
    pub fn log_ids(&self) -> Vec<LogId> {
        self.store.log_ids()
    }

    /// Number of logs
    pub fn log_count(&self) -> usize {
        self.store.log_count()
    }

    // ========================================================================
    // Write path
    // ========================================================================

    /// Append a commit to `id`
    ///
    /// The single write path: allocate the next revision, then write the
    /// commit at it. The two steps are not one atomic unit; if the insert
    /// fails after allocation, the revision stays allocated with no commit
    /// behind it and the error is surfaced unchanged. Callers reconcile by
    /// checking `commit(revision)` and writing again at a fresh revision.
    pub fn new_commit(&self, id: &LogId, data: Vec<u8>) -> Result<Commit> {
        let revision = self.counter.increment(id)?;
        let commit = self.commits.insert(id, revision, data)?;
        tracing::debug!(log = %id, revision, "new commit");
        Ok(commit)
    }

    /// Allocate `count` contiguous revisions without writing commits
    ///
    /// For writers that batch: the returned range is reserved to the
    /// caller, who then writes each commit individually. Unwritten
    /// revisions from the range surface as gaps.
    pub fn allocate_revisions(&self, id: &LogId, count: u64) -> Result<RevisionRange> {
        self.counter.increment_by(id, count)
    }

    /// Mark the commit at `revision` of `id` as applied
    pub fn mark_applied(&self, id: &LogId, revision: Revision) -> Result<Commit> {
        self.commits.mark_applied(id, revision)
    }

    /// Advance `id`'s consumer watermark to `revision`
    ///
    /// The watermark can only move forward and can never pass the
    /// high-water mark.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the log does not exist
    /// - `Validation` if `revision` exceeds the high-water mark or moves
    ///   the watermark backwards
    pub fn set_applied_revision(&self, id: &LogId, revision: Revision) -> Result<()> {
        self.store.update_log(id, |record| {
            let latest = record.latest();
            if revision > latest {
                return Err(Error::Validation(format!(
                    "applied revision {} exceeds latest revision {}",
                    revision, latest
                )));
            }
            if revision < record.applied() {
                return Err(Error::Validation(format!(
                    "applied revision cannot move backwards ({} -> {})",
                    record.applied(),
                    revision
                )));
            }
            record.applied_revision = Some(revision);
            Ok(())
        })
    }

    // ========================================================================
    // Read path
    // ========================================================================

    /// Everything committed up to the high-water mark, ascending
    ///
    /// Bounded to `limits.commits`. May return fewer commits than the
    /// high-water mark implies when an allocated revision was never
    /// written.
    pub fn commits(&self, id: &LogId) -> Result<Vec<Commit>> {
        let record = self.log(id)?;
        self.commits.scan(
            id,
            CommitQuery::limited(self.limits.commits).max_revision(record.latest()),
        )
    }

    /// Projection of assigned revision numbers, ascending
    ///
    /// Bounded to `limits.revisions`.
    pub fn revisions(&self, id: &LogId) -> Result<Vec<Revision>> {
        let commits = self
            .commits
            .scan(id, CommitQuery::limited(self.limits.revisions))?;
        Ok(commits.into_iter().map(|c| c.revision).collect())
    }

    /// Commits with `bottom <= revision <= top` and the given applied flag
    ///
    /// Ascending, bounded to `limits.range`.
    pub fn commit_range(
        &self,
        id: &LogId,
        bottom: Revision,
        top: Revision,
        applied: bool,
    ) -> Result<Vec<Commit>> {
        self.commits.scan(
            id,
            CommitQuery::limited(self.limits.range)
                .min_revision(bottom)
                .max_revision(top)
                .applied(applied),
        )
    }

    /// The queue of work not yet consumed
    ///
    /// Unapplied commits at or above the consumer watermark (inclusive; an
    /// unset watermark reads as 0), ascending, bounded to
    /// `limits.uncommitted`.
    pub fn uncommitted(&self, id: &LogId) -> Result<Vec<Commit>> {
        let record = self.log(id)?;
        self.commits.scan(
            id,
            CommitQuery::limited(self.limits.uncommitted)
                .min_revision(record.applied())
                .applied(false),
        )
    }

    /// The commit at `revision` of `id`
    ///
    /// Scoped to the parent log. `Ok(None)` means the revision was never
    /// written, either because it is beyond the high-water mark or because
    /// it was allocated and the commit never landed.
    pub fn commit(&self, id: &LogId, revision: Revision) -> Result<Option<Commit>> {
        self.commits.get(id, revision)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("log_count", &self.log_count())
            .field("limits", &self.limits)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db_with_log(id: &str) -> (Database, LogId) {
        let db = Database::new();
        let log_id = LogId::new(id);
        db.create_log(Some(log_id.clone())).unwrap();
        (db, log_id)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[test]
    fn create_log_with_generated_id() {
        let db = Database::new();
        let record = db.create_log(None).unwrap();
        assert!(db.log_exists(&record.id));
        assert_eq!(db.log_count(), 1);
    }

    #[test]
    fn create_log_twice_conflicts() {
        let (db, id) = db_with_log("orders");
        let err = db.create_log(Some(id)).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn unknown_log_not_found() {
        let db = Database::new();
        assert!(db.log(&LogId::new("missing")).unwrap_err().is_not_found());
        assert!(db
            .new_commit(&LogId::new("missing"), vec![])
            .unwrap_err()
            .is_not_found());
    }

    // ========================================================================
    // Write path
    // ========================================================================

    #[test]
    fn new_commit_assigns_contiguous_revisions() {
        let (db, id) = db_with_log("orders");
        for expected in 1..=5 {
            let commit = db.new_commit(&id, vec![]).unwrap();
            assert_eq!(commit.revision, expected);
        }
        assert_eq!(db.log(&id).unwrap().latest_revision, Some(5));
    }

    #[test]
    fn allocation_without_commit_leaves_observable_gap() {
        let (db, id) = db_with_log("orders");
        db.new_commit(&id, vec![]).unwrap();

        // An allocation with no commit behind it advances the mark only.
        db.allocate_revisions(&id, 1).unwrap();

        db.new_commit(&id, vec![]).unwrap();

        let record = db.log(&id).unwrap();
        assert_eq!(record.latest_revision, Some(3));
        assert!(db.commit(&id, 2).unwrap().is_none());

        let revisions: Vec<u64> = db.commits(&id).unwrap().iter().map(|c| c.revision).collect();
        assert_eq!(revisions, vec![1, 3]);
    }

    #[test]
    fn watermark_validation() {
        let (db, id) = db_with_log("orders");
        for _ in 0..3 {
            db.new_commit(&id, vec![]).unwrap();
        }

        db.set_applied_revision(&id, 2).unwrap();
        assert_eq!(db.log(&id).unwrap().applied_revision, Some(2));

        // Beyond the high-water mark.
        let err = db.set_applied_revision(&id, 4).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Backwards.
        let err = db.set_applied_revision(&id, 1).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Re-asserting the current watermark is fine.
        db.set_applied_revision(&id, 2).unwrap();
    }

    // ========================================================================
    // Read path
    // ========================================================================

    #[test]
    fn commits_bounded_by_high_water_mark() {
        let (db, id) = db_with_log("orders");
        for _ in 0..4 {
            db.new_commit(&id, vec![]).unwrap();
        }
        let revisions: Vec<u64> = db.commits(&id).unwrap().iter().map(|c| c.revision).collect();
        assert_eq!(revisions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn commits_empty_log() {
        let (db, id) = db_with_log("orders");
        assert!(db.commits(&id).unwrap().is_empty());
        assert!(db.revisions(&id).unwrap().is_empty());
        assert!(db.uncommitted(&id).unwrap().is_empty());
    }

    #[test]
    fn revisions_projection_truncates_at_limit() {
        let (db, id) = db_with_log("orders");
        for _ in 0..15 {
            db.new_commit(&id, vec![]).unwrap();
        }
        let revisions = db.revisions(&id).unwrap();
        assert_eq!(revisions, (1..=10).collect::<Vec<u64>>());
    }

    #[test]
    fn commit_range_filters_applied() {
        let (db, id) = db_with_log("orders");
        for _ in 0..10 {
            db.new_commit(&id, vec![]).unwrap();
        }
        db.mark_applied(&id, 5).unwrap();

        let range: Vec<u64> = db
            .commit_range(&id, 3, 7, false)
            .unwrap()
            .iter()
            .map(|c| c.revision)
            .collect();
        assert_eq!(range, vec![3, 4, 6, 7]);

        let applied: Vec<u64> = db
            .commit_range(&id, 3, 7, true)
            .unwrap()
            .iter()
            .map(|c| c.revision)
            .collect();
        assert_eq!(applied, vec![5]);
    }

    #[test]
    fn uncommitted_inclusive_of_watermark() {
        let (db, id) = db_with_log("orders");
        for _ in 0..5 {
            db.new_commit(&id, vec![]).unwrap();
        }
        db.set_applied_revision(&id, 3).unwrap();

        let pending: Vec<u64> = db
            .uncommitted(&id)
            .unwrap()
            .iter()
            .map(|c| c.revision)
            .collect();
        assert_eq!(pending, vec![3, 4, 5]);
    }

    #[test]
    fn uncommitted_skips_applied_commits() {
        let (db, id) = db_with_log("orders");
        for _ in 0..5 {
            db.new_commit(&id, vec![]).unwrap();
        }
        db.set_applied_revision(&id, 3).unwrap();
        db.mark_applied(&id, 3).unwrap();
        db.mark_applied(&id, 4).unwrap();

        let pending: Vec<u64> = db
            .uncommitted(&id)
            .unwrap()
            .iter()
            .map(|c| c.revision)
            .collect();
        assert_eq!(pending, vec![5]);
    }

    #[test]
    fn custom_limits_honored() {
        let db = Database::with_limits(QueryLimits {
            commits: 3,
            revisions: 2,
            range: 2,
            uncommitted: 2,
        });
        let id = LogId::new("orders");
        db.create_log(Some(id.clone())).unwrap();
        for _ in 0..6 {
            db.new_commit(&id, vec![]).unwrap();
        }

        assert_eq!(db.commits(&id).unwrap().len(), 3);
        assert_eq!(db.revisions(&id).unwrap(), vec![1, 2]);
        assert_eq!(db.commit_range(&id, 1, 6, false).unwrap().len(), 2);
        assert_eq!(db.uncommitted(&id).unwrap().len(), 2);
    }
}
