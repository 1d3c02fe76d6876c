//! Sharded storage for logs and commits
//!
//! One shard per log, held in a DashMap. Each shard carries its own RwLock
//! over the log record and an ordered map of that log's commits.
//!
//! # Design
//!
//! - DashMap: the shard map itself; bucket locks are held only for the
//!   lookup, never across record mutation
//! - Per-log RwLock: serializes read-modify-write on one log's record;
//!   different logs hold different locks and never contend
//! - BTreeMap keyed by revision: commit range scans walk in ascending
//!   order without sorting
//!
//! The shard write lock is the single-key transaction primitive the
//! revision counter runs on: no two concurrent updates to the same log can
//! observe the same pre-update record.

use crate::query::CommitQuery;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use revlog_core::{Commit, Error, LogId, LogRecord, Result, Revision};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

/// Per-log shard: the record plus its commits
///
/// All access goes through the shard's RwLock. Writers to the same log
/// serialize here; writers to different logs never touch the same shard.
#[derive(Debug)]
struct LogShard {
    state: RwLock<LogState>,
}

#[derive(Debug)]
struct LogState {
    record: LogRecord,
    commits: BTreeMap<Revision, Commit>,
}

impl LogShard {
    fn new(record: LogRecord) -> Self {
        LogShard {
            state: RwLock::new(LogState {
                record,
                commits: BTreeMap::new(),
            }),
        }
    }
}

/// Sharded store - DashMap by LogId, one lock per log
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - reads take the target shard's read lock
/// - `update_log` and commit writes take the target shard's write lock
/// - different logs never contend
///
/// # Example
///
/// ```
/// use revlog_core::{LogId, LogRecord};
/// use revlog_storage::ShardedStore;
///
/// let store = ShardedStore::new();
/// store.create_log(LogRecord::new(LogId::new("orders"))).unwrap();
/// assert!(store.has_log(&LogId::new("orders")));
/// ```
pub struct ShardedStore {
    shards: DashMap<LogId, Arc<LogShard>>,
}

impl ShardedStore {
    /// Create an empty store
    pub fn new() -> Self {
        ShardedStore {
            shards: DashMap::new(),
        }
    }

    /// Create with capacity for an expected number of logs
    pub fn with_capacity(logs: usize) -> Self {
        ShardedStore {
            shards: DashMap::with_capacity(logs),
        }
    }

    fn shard(&self, id: &LogId) -> Result<Arc<LogShard>> {
        // Clone the Arc out so the DashMap bucket lock is released before
        // the shard lock is taken.
        self.shards
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NotFound(format!("log {}", id)))
    }

    // ========================================================================
    // Log records
    // ========================================================================

    /// Persist a fresh log record
    ///
    /// Fails with a conflict if a log already exists under the same id.
    pub fn create_log(&self, record: LogRecord) -> Result<()> {
        match self.shards.entry(record.id.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(Error::Conflict(format!(
                "log {} already exists",
                record.id
            ))),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(Arc::new(LogShard::new(record)));
                Ok(())
            }
        }
    }

    /// Read a log record
    pub fn get_log(&self, id: &LogId) -> Option<LogRecord> {
        self.shards
            .get(id)
            .map(|shard| shard.state.read().record.clone())
    }

    /// Check if a log exists
    pub fn has_log(&self, id: &LogId) -> bool {
        self.shards.contains_key(id)
    }

    /// Ids of all stored logs
    pub fn log_ids(&self) -> Vec<LogId> {
        self.shards.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of stored logs
    pub fn log_count(&self) -> usize {
        self.shards.len()
    }

    /// Run a read-modify-write on one log's record
    ///
    /// This is the single-key transaction primitive. The closure runs under
    /// the shard's write lock against a draft of the record; if it returns
    /// `Ok`, the draft replaces the stored record with a refreshed `updated`
    /// timestamp. If it returns `Err`, the stored record is untouched.
    ///
    /// Concurrent calls on the same log serialize; calls on different logs
    /// proceed independently.
    pub fn update_log<T>(
        &self,
        id: &LogId,
        f: impl FnOnce(&mut LogRecord) -> Result<T>,
    ) -> Result<T> {
        let shard = self.shard(id)?;
        let mut state = shard.state.write();
        let mut draft = state.record.clone();
        let out = f(&mut draft)?;
        draft.updated = Utc::now();
        state.record = draft;
        Ok(out)
    }

    // ========================================================================
    // Commits
    // ========================================================================

    /// Persist a commit under its parent log
    ///
    /// Fails with a conflict if a commit already exists at the same
    /// (parent, revision); the stored commit is left untouched. With a
    /// correctly used counter this is unreachable, so a hit is logged.
    pub fn insert_commit(&self, commit: Commit) -> Result<Commit> {
        let shard = self.shard(&commit.parent_key)?;
        let mut state = shard.state.write();
        if state.commits.contains_key(&commit.revision) {
            tracing::warn!(
                log = %commit.parent_key,
                revision = commit.revision,
                "rejected duplicate commit"
            );
            return Err(Error::Conflict(format!(
                "commit already exists at revision {} of log {}",
                commit.revision, commit.parent_key
            )));
        }
        state.commits.insert(commit.revision, commit.clone());
        Ok(commit)
    }

    /// Read one commit of a log
    pub fn get_commit(&self, id: &LogId, revision: Revision) -> Result<Option<Commit>> {
        let shard = self.shard(id)?;
        let state = shard.state.read();
        Ok(state.commits.get(&revision).cloned())
    }

    /// Scan a log's commits in ascending revision order
    ///
    /// Walks the ordered map between the query's bounds, drops commits the
    /// filter rejects, and truncates to the query's limit.
    pub fn scan_commits(&self, id: &LogId, query: &CommitQuery) -> Result<Vec<Commit>> {
        let shard = self.shard(id)?;
        let state = shard.state.read();

        // An inverted window selects nothing; BTreeMap::range would panic.
        if let (Some(min), Some(max)) = (query.min_revision, query.max_revision) {
            if min > max {
                return Ok(Vec::new());
            }
        }

        let lower = query
            .min_revision
            .map_or(Bound::Unbounded, Bound::Included);
        let upper = query
            .max_revision
            .map_or(Bound::Unbounded, Bound::Included);

        Ok(state
            .commits
            .range((lower, upper))
            .map(|(_, commit)| commit)
            .filter(|commit| query.matches(commit))
            .take(query.limit)
            .cloned()
            .collect())
    }

    /// Flip a commit's `applied` flag to true
    ///
    /// One-way and idempotent: re-applying an applied commit is a harmless
    /// success that changes nothing. Returns the stored commit.
    pub fn mark_applied(&self, id: &LogId, revision: Revision) -> Result<Commit> {
        let shard = self.shard(id)?;
        let mut state = shard.state.write();
        let commit = state.commits.get_mut(&revision).ok_or_else(|| {
            Error::NotFound(format!("commit at revision {} of log {}", revision, id))
        })?;
        if !commit.applied {
            commit.applied = true;
            commit.updated = Utc::now();
        }
        Ok(commit.clone())
    }

    /// Number of commits stored for a log
    pub fn commit_count(&self, id: &LogId) -> Result<usize> {
        let shard = self.shard(id)?;
        let state = shard.state.read();
        Ok(state.commits.len())
    }

    /// Total commits across all logs
    pub fn total_commits(&self) -> usize {
        self.shards
            .iter()
            .map(|entry| entry.value().state.read().commits.len())
            .sum()
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShardedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedStore")
            .field("log_count", &self.log_count())
            .field("total_commits", &self.total_commits())
            .finish()
    }
}
