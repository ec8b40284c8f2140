// Integration tests for RentGuard and Handle
// Tests cover: exactly-once teardown, dropped-state rejection, thread interleavings

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use rentbuf::{RentError, RentGuard};

/// A disposable resource that counts how many times it is torn down.
struct Probe {
    teardowns: Arc<AtomicUsize>,
}

fn probed_guard() -> (RentGuard<Probe>, Arc<AtomicUsize>) {
    let teardowns = Arc::new(AtomicUsize::new(0));
    let probe = Probe {
        teardowns: Arc::clone(&teardowns),
    };
    let guard = RentGuard::with_teardown(probe, |probe| {
        probe.teardowns.fetch_add(1, Ordering::SeqCst);
    });
    (guard, teardowns)
}

// ============================================================================
// Exactly-Once Teardown
// ============================================================================

#[test]
fn test_three_handles_teardown_on_last_release() {
    let (guard, teardowns) = probed_guard();

    let mut a = guard.rent().unwrap();
    let mut b = guard.rent().unwrap();
    let mut c = guard.rent().unwrap();
    assert_eq!(guard.references(), 3);

    // Releasing two of three leaves the resource alive and untouched.
    a.release();
    b.release();
    assert_eq!(teardowns.load(Ordering::SeqCst), 0);
    assert!(!guard.is_dropped());
    assert_eq!(c.value().unwrap().teardowns.load(Ordering::SeqCst), 0);

    // The third release triggers teardown exactly once.
    c.release();
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
    assert!(guard.is_dropped());
}

#[test]
fn test_release_order_does_not_matter() {
    for order in [[0, 1, 2], [2, 1, 0], [1, 2, 0], [0, 2, 1]] {
        let (guard, teardowns) = probed_guard();
        let mut handles = vec![
            guard.rent().unwrap(),
            guard.rent().unwrap(),
            guard.rent().unwrap(),
        ];
        for &index in &order {
            handles[index].release();
        }
        assert_eq!(
            teardowns.load(Ordering::SeqCst),
            1,
            "order {:?} must tear down exactly once",
            order
        );
    }
}

#[test]
fn test_redundant_releases_never_double_teardown() {
    let (guard, teardowns) = probed_guard();
    let mut a = guard.rent().unwrap();
    let mut b = guard.rent().unwrap();

    a.release();
    a.release();
    a.release();
    assert_eq!(guard.references(), 1);

    b.release();
    b.release();
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dropping_handles_counts_as_release() {
    let (guard, teardowns) = probed_guard();
    {
        let _a = guard.rent().unwrap();
        let _b = guard.rent().unwrap();
    }
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Dropped-State Rejection
// ============================================================================

#[test]
fn test_rent_after_zero_fails_deterministically() {
    let (guard, _teardowns) = probed_guard();
    let mut handle = guard.rent().unwrap();
    handle.release();

    for _ in 0..3 {
        assert!(
            matches!(guard.rent(), Err(RentError::InvalidState { .. })),
            "every rent after the count reached zero must fail"
        );
    }
}

#[test]
fn test_released_handle_value_fails() {
    let guard = RentGuard::new(123u64);
    let mut handle = guard.rent().unwrap();
    assert_eq!(*handle.value().unwrap(), 123);

    handle.release();
    assert!(matches!(
        handle.value(),
        Err(RentError::InvalidState { .. })
    ));
}

// ============================================================================
// Thread Interleavings
// ============================================================================

#[test]
fn test_concurrent_release_tears_down_once() {
    for _ in 0..50 {
        let (guard, teardowns) = probed_guard();
        let handles: Vec<_> = (0..8).map(|_| guard.rent().unwrap()).collect();

        let threads: Vec<_> = handles
            .into_iter()
            .map(|mut handle| {
                thread::spawn(move || {
                    handle.release();
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert!(guard.is_dropped());
        assert_eq!(guard.references(), 0);
    }
}

#[test]
fn test_concurrent_rent_and_release_from_clones() {
    let (guard, teardowns) = probed_guard();
    let anchor = guard.rent().unwrap();

    let threads: Vec<_> = (0..4)
        .map(|_| {
            let guard = guard.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    // The anchor handle keeps the guard live, so every
                    // rent must succeed.
                    let mut handle = guard.rent().unwrap();
                    assert_eq!(handle.value().unwrap().teardowns.load(Ordering::SeqCst), 0);
                    handle.release();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().unwrap();
    }

    assert_eq!(teardowns.load(Ordering::SeqCst), 0);
    assert_eq!(guard.references(), 1);

    drop(anchor);
    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Guard Composition
// ============================================================================

#[test]
fn test_guard_wrapping_growable_writer() {
    use rentbuf::{BucketPool, GrowableWriter};

    let pool = Arc::new(BucketPool::<u8>::new());
    let writer = GrowableWriter::with_baseline(Arc::clone(&pool) as _, 8).unwrap();

    let guard = RentGuard::with_teardown(writer, |mut writer| {
        writer.dispose();
    });

    let mut handle = guard.rent().unwrap();
    assert_eq!(handle.value().unwrap().written(), 0);
    handle.release();

    // Teardown disposed the writer, returning its buffer to the pool.
    assert_eq!(pool.idle_blocks(), 1);
}
