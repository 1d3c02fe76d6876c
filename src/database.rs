//! Main database entry point for revlog.

use crate::logs::Logs;
use revlog_core::QueryLimits;
use revlog_engine::Database;
use std::sync::Arc;

/// The revlog database.
///
/// The entry point for all operations. Everything lives in memory; drop
/// the value and the data is gone.
///
/// # Example
///
/// ```
/// use revlog::prelude::*;
///
/// # fn main() -> revlog::Result<()> {
/// let db = RevLog::new();
/// let log = db.logs.create()?;
/// let commit = log.new_commit(&"payload")?;
/// assert_eq!(commit.revision, 1);
/// # Ok(())
/// # }
/// ```
pub struct RevLog {
    /// The underlying engine
    inner: Arc<Database>,

    /// Log lifecycle and lookup
    pub logs: Logs,
}

impl RevLog {
    /// Create a database with default query limits.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for database configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use revlog::{QueryLimits, RevLog};
    ///
    /// let db = RevLog::builder()
    ///     .query_limits(QueryLimits { commits: 500, ..QueryLimits::default() })
    ///     .build();
    /// assert_eq!(db.query_limits().commits, 500);
    /// ```
    pub fn builder() -> RevLogBuilder {
        RevLogBuilder::new()
    }

    /// The query limits this database was built with.
    pub fn query_limits(&self) -> &QueryLimits {
        self.inner.limits()
    }
}

impl Default for RevLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`RevLog`] configuration.
pub struct RevLogBuilder {
    limits: QueryLimits,
}

impl RevLogBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        RevLogBuilder {
            limits: QueryLimits::default(),
        }
    }

    /// Override the bounds applied to derived queries.
    pub fn query_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the database.
    pub fn build(self) -> RevLog {
        let inner = Arc::new(Database::with_limits(self.limits));
        RevLog {
            logs: Logs::new(Arc::clone(&inner)),
            inner,
        }
    }
}

impl Default for RevLogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
