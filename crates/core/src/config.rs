//! Query configuration

/// Bounds applied to every derived query.
///
/// All read paths return finite, non-restartable result sets; there is no
/// pagination cursor. Callers page by revision bounds instead. The defaults
/// are deliberately conservative; deployments that need wider windows raise
/// them through the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    /// Maximum commits returned by the full-log listing
    pub commits: usize,
    /// Maximum entries returned by the revision projection
    pub revisions: usize,
    /// Maximum commits returned by a bounded range query
    pub range: usize,
    /// Maximum commits returned by the uncommitted queue query
    pub uncommitted: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        QueryLimits {
            commits: 100,
            revisions: 10,
            range: 10,
            uncommitted: 10,
        }
    }
}
