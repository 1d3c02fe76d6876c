//! Storage layer for revlog
//!
//! This crate implements the sharded in-memory backend:
//! - ShardedStore: DashMap of per-log shards, each a RwLock over the log
//!   record and its ordered commit map
//! - Per-log read-modify-write as the single-key transaction primitive
//! - Ordered, filtered commit scans via CommitQuery

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod query;
pub mod sharded;

pub use query::CommitQuery;
pub use sharded::ShardedStore;
