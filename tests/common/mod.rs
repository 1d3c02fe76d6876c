//! Shared helpers for the integration suites.

#![allow(dead_code)]

pub use revlog::prelude::*;

/// Install a test-writer subscriber so traced events land in test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Fresh database plus one log to work against.
pub fn db_with_log() -> (RevLog, LogHandle) {
    init_tracing();
    let db = RevLog::new();
    let log = db.logs.create().unwrap();
    (db, log)
}

/// Append `n` empty commits and return their revisions.
pub fn fill(log: &LogHandle, n: u64) -> Vec<u64> {
    (0..n)
        .map(|i| log.new_commit(&format!("payload-{}", i)).unwrap().revision)
        .collect()
}
