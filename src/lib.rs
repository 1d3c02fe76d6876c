//! # revlog
//!
//! Embedded linearized commit log with transactional revision sequencing.
//!
//! A log serializes writes from many independent callers into one strictly
//! increasing revision sequence, decoupling cheap sequencing from whatever
//! heavier processing consumes the commits later. Each append allocates the
//! next revision through a per-log transactional counter, then stores an
//! immutable commit at that revision.
//!
//! ## Quick Start
//!
//! ```
//! use revlog::prelude::*;
//!
//! # fn main() -> revlog::Result<()> {
//! let db = RevLog::new();
//!
//! // Create a log and append to it
//! let log = db.logs.create()?;
//! log.new_commit(&"first")?;
//! log.new_commit(&"second")?;
//!
//! // Ordered reads
//! assert_eq!(log.revisions()?, vec![1, 2]);
//!
//! // A consumer works the queue and reports progress
//! for commit in log.uncommitted()? {
//!     log.mark_applied(commit.revision)?;
//! }
//! log.set_applied_revision(2)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - Revisions of one log are assigned serially: 1, 2, 3, ... with no
//!   duplicates, under any number of concurrent writers
//! - Writers to different logs never block each other
//! - Appending is two-step (allocate, then store); a failure in between
//!   leaves a detectable gap rather than a silent reorder
//!
//! ## Structure
//!
//! - [`RevLog`] - the database entry point
//! - [`Logs`] - log lifecycle, reached as `db.logs`
//! - [`LogHandle`] - per-log operations: append, queries, applied state

#![warn(missing_docs)]

mod database;
mod logs;

pub mod prelude;

// Re-export main entry points
pub use database::{RevLog, RevLogBuilder};
pub use logs::{LogHandle, Logs};

// Re-export the core vocabulary
pub use revlog_core::{Commit, Error, LogId, LogRecord, QueryLimits, Result, Revision, RevisionRange};
