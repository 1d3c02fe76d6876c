//! Core types for the revlog commit log
//!
//! This crate defines the vocabulary shared by every layer of the system:
//! - [`LogId`]: identity of a log, the unit of sequencing
//! - [`LogRecord`] / [`Commit`]: the two persisted record types
//! - [`Error`] / [`Result`]: the canonical error surface
//! - [`QueryLimits`]: bounds applied to every derived query

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod record;
pub mod types;

pub use config::QueryLimits;
pub use error::{Error, Result};
pub use record::{Commit, LogRecord};
pub use types::{LogId, Revision, RevisionRange};
