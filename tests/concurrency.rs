//! Concurrency guarantees: serialization per log, isolation across logs.

mod common;

use common::*;
use std::collections::HashSet;
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

// ============================================================================
// Serialization on one log
// ============================================================================

#[test]
fn concurrent_writers_get_distinct_revisions() {
    let (_db, log) = db_with_log();
    const WRITERS: usize = 8;
    const PER_WRITER: usize = 25;

    let barrier = Arc::new(Barrier::new(WRITERS));
    let seen = Arc::new(Mutex::new(HashSet::new()));

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let log = log.clone();
            let barrier = Arc::clone(&barrier);
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_WRITER {
                    let commit = log.new_commit(&format!("{}-{}", w, i)).unwrap();
                    assert!(
                        seen.lock().unwrap().insert(commit.revision),
                        "revision {} assigned twice",
                        commit.revision
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let seen = seen.lock().unwrap();
    let expected: HashSet<u64> = (1..=(WRITERS * PER_WRITER) as u64).collect();
    assert_eq!(*seen, expected);
    assert_eq!(
        log.latest_revision().unwrap(),
        Some((WRITERS * PER_WRITER) as u64)
    );
}

#[test]
fn concurrent_commits_all_stored() {
    let (_db, log) = db_with_log();
    const WRITERS: usize = 4;
    const PER_WRITER: u64 = 50;

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let log = log.clone();
            thread::spawn(move || {
                for _ in 0..PER_WRITER {
                    log.new_commit(&"x").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // Every allocated revision has a commit behind it: no gaps under
    // concurrency alone.
    let total = WRITERS as u64 * PER_WRITER;
    for revision in 1..=total {
        assert!(
            log.commit(revision).unwrap().is_some(),
            "revision {} missing",
            revision
        );
    }
}

// ============================================================================
// Isolation across logs
// ============================================================================

#[test]
fn sequences_of_different_logs_are_independent() {
    init_tracing();
    let db = RevLog::new();
    let log_a = db.logs.create_with_id("a").unwrap();
    let log_b = db.logs.create_with_id("b").unwrap();

    let writer_a = {
        let log_a = log_a.clone();
        thread::spawn(move || {
            for _ in 0..40 {
                log_a.new_commit(&"a").unwrap();
            }
        })
    };
    let writer_b = {
        let log_b = log_b.clone();
        thread::spawn(move || {
            for _ in 0..15 {
                log_b.new_commit(&"b").unwrap();
            }
        })
    };

    writer_a.join().unwrap();
    writer_b.join().unwrap();

    // Each log's sequence reflects only its own writes.
    assert_eq!(log_a.latest_revision().unwrap(), Some(40));
    assert_eq!(log_b.latest_revision().unwrap(), Some(15));

    let revisions_b: Vec<u64> = log_b.commits().unwrap().iter().map(|c| c.revision).collect();
    assert_eq!(revisions_b, (1..=15).collect::<Vec<u64>>());
}

#[test]
fn many_logs_under_parallel_load() {
    init_tracing();
    let db = Arc::new(RevLog::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                let log = db.logs.create_with_id(format!("log-{}", i)).unwrap();
                for _ in 0..30 {
                    log.new_commit(&"x").unwrap();
                }
                log
            })
        })
        .collect();

    let logs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(db.logs.count(), 8);
    for log in &logs {
        assert_eq!(log.latest_revision().unwrap(), Some(30));
    }
}

// ============================================================================
// Readers against writers
// ============================================================================

#[test]
fn readers_never_observe_reordered_commits() {
    let (_db, log) = db_with_log();

    let writer = {
        let log = log.clone();
        thread::spawn(move || {
            for _ in 0..200 {
                log.new_commit(&"x").unwrap();
            }
        })
    };

    // Readers may see a prefix, never a permutation.
    for _ in 0..50 {
        let revisions = log.revisions().unwrap();
        let mut sorted = revisions.clone();
        sorted.sort_unstable();
        assert_eq!(revisions, sorted);
    }

    writer.join().unwrap();
}

#[test]
fn concurrent_mark_applied_is_safe() {
    let (_db, log) = db_with_log();
    fill(&log, 20);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let log = log.clone();
            thread::spawn(move || {
                for revision in 1..=20 {
                    log.mark_applied(revision).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for commit in log.commits().unwrap() {
        assert!(commit.applied);
    }
}
