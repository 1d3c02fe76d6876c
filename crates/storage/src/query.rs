//! Commit scan filters

use revlog_core::{Commit, Revision};

/// Filter for an ordered commit scan.
///
/// Revision bounds are inclusive and optional (open when `None`). The
/// `applied` filter is an equality test when set. Results are always
/// ascending by revision and truncated to `limit`.
///
/// # Examples
///
/// ```
/// use revlog_storage::CommitQuery;
///
/// let query = CommitQuery::limited(10)
///     .min_revision(3)
///     .max_revision(7)
///     .applied(false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitQuery {
    /// Lowest revision to include (inclusive); open when `None`
    pub min_revision: Option<Revision>,
    /// Highest revision to include (inclusive); open when `None`
    pub max_revision: Option<Revision>,
    /// When set, only commits whose `applied` flag equals this value
    pub applied: Option<bool>,
    /// Maximum number of commits returned
    pub limit: usize,
}

impl CommitQuery {
    /// Unbounded scan truncated to `limit`
    pub fn limited(limit: usize) -> Self {
        CommitQuery {
            min_revision: None,
            max_revision: None,
            applied: None,
            limit,
        }
    }

    /// Set the inclusive lower revision bound
    pub fn min_revision(mut self, revision: Revision) -> Self {
        self.min_revision = Some(revision);
        self
    }

    /// Set the inclusive upper revision bound
    pub fn max_revision(mut self, revision: Revision) -> Self {
        self.max_revision = Some(revision);
        self
    }

    /// Filter on the `applied` flag
    pub fn applied(mut self, applied: bool) -> Self {
        self.applied = Some(applied);
        self
    }

    /// Whether `commit` passes the non-range parts of the filter
    ///
    /// Range bounds are handled by the store's ordered scan; this only
    /// checks the `applied` equality.
    pub fn matches(&self, commit: &Commit) -> bool {
        self.applied.map_or(true, |want| commit.applied == want)
    }
}
