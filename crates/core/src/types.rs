//! Identity and revision types
//!
//! - [`LogId`]: unique identifier for a log
//! - [`Revision`]: position of a commit within its log's sequence
//! - [`RevisionRange`]: inclusive range returned by batched allocation

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position of a commit within its log's sequence.
///
/// Revisions start at 1; revision 0 is never assigned. An unset counter
/// reads as 0, so the first allocation always yields 1.
pub type Revision = u64;

/// Unique identifier for a log
///
/// LogId is the shard key for everything the system stores. It is either
/// assigned by the caller (any non-empty string) or generated at creation
/// via [`LogId::generate`].
///
/// # Examples
///
/// ```
/// use revlog_core::types::LogId;
///
/// let named = LogId::new("orders");
/// assert_eq!(named.as_str(), "orders");
///
/// let generated = LogId::generate();
/// assert_ne!(generated, LogId::generate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogId(String);

impl LogId {
    /// Create a LogId from a caller-assigned name
    pub fn new(id: impl Into<String>) -> Self {
        LogId(id.into())
    }

    /// Generate a fresh random LogId (UUID v4 text form)
    pub fn generate() -> Self {
        LogId(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LogId {
    fn from(s: &str) -> Self {
        LogId::new(s)
    }
}

impl From<String> for LogId {
    fn from(s: String) -> Self {
        LogId::new(s)
    }
}

/// Inclusive range of revisions allocated in one batch
///
/// Returned by the counter's batched allocation: `[start, end]` with
/// `start <= end`, both assigned to the caller and safe to write against.
///
/// # Examples
///
/// ```
/// use revlog_core::types::RevisionRange;
///
/// let range = RevisionRange::new(4, 6);
/// assert_eq!(range.len(), 3);
/// let revs: Vec<u64> = range.into_iter().collect();
/// assert_eq!(revs, vec![4, 5, 6]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    start: Revision,
    end: Revision,
}

impl RevisionRange {
    /// Create a range covering `[start, end]` inclusive
    ///
    /// Invariant: `start <= end`. Callers construct ranges from a counter
    /// allocation, which always satisfies this.
    pub fn new(start: Revision, end: Revision) -> Self {
        debug_assert!(start <= end);
        RevisionRange { start, end }
    }

    /// First revision in the range
    pub fn start(&self) -> Revision {
        self.start
    }

    /// Last revision in the range
    pub fn end(&self) -> Revision {
        self.end
    }

    /// Number of revisions covered
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Whether the range covers no revisions (never true for allocated ranges)
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `revision` falls inside the range
    pub fn contains(&self, revision: Revision) -> bool {
        revision >= self.start && revision <= self.end
    }
}

impl IntoIterator for RevisionRange {
    type Item = Revision;
    type IntoIter = std::ops::RangeInclusive<Revision>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..=self.end
    }
}

impl std::fmt::Display for RevisionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
