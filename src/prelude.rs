//! Convenience re-exports for typical usage.
//!
//! ```
//! use revlog::prelude::*;
//! ```

pub use crate::{
    Commit, Error, LogHandle, LogId, LogRecord, Logs, QueryLimits, Result, RevLog, RevLogBuilder,
    Revision, RevisionRange,
};
