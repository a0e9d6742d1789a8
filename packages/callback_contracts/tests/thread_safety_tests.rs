//! Tests that exercise the thread-safe wrapper types across threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use callback_contracts::{CallOnceStrict, CallbackGuard, ExpiryAction, SharedFn};

#[test]
fn shared_state_is_consistent_across_threads() {
    let counter = SharedFn::new({
        let mut total = 0_usize;
        move || {
            total += 1;
            total
        }
    });

    thread::scope(|s| {
        for _ in 0..8 {
            let counter = counter.clone();
            s.spawn(move || {
                for _ in 0..100 {
                    counter.call(()).unwrap();
                }
            });
        }
    });

    assert_eq!(counter.call(()), Ok(801));
}

#[test]
fn expiry_fires_once_when_handles_dropped_on_many_threads() {
    let fired = Arc::new(AtomicUsize::new(0));

    let action = ExpiryAction::new({
        let fired = Arc::clone(&fired);
        move || {
            fired.fetch_add(1, Ordering::Relaxed);
        }
    });

    let handles: Vec<_> = (0..8).map(|_| action.clone()).collect();
    drop(action);

    thread::scope(|s| {
        for handle in handles {
            s.spawn(move || drop(handle));
        }
    });

    assert_eq!(fired.load(Ordering::Relaxed), 1);
}

#[test]
fn concurrent_release_fires_once() {
    let fired = Arc::new(AtomicUsize::new(0));

    let action = ExpiryAction::new({
        let fired = Arc::clone(&fired);
        move || {
            fired.fetch_add(1, Ordering::Relaxed);
        }
    });

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| action.release());
        }
    });

    assert_eq!(fired.load(Ordering::Relaxed), 1);
    assert!(!action.is_pending());
}

#[test]
fn strict_wrapper_moved_to_worker_thread() {
    let mut once = CallOnceStrict::new(|x: u64| x.pow(2));

    let result = thread::spawn(move || (once.call((12,)), once.call((12,))))
        .join()
        .unwrap();

    assert_eq!(result.0, Ok(144));
    assert!(result.1.is_err());
}

#[test]
fn guarded_callback_on_worker_observes_guard_drop() {
    let guard = CallbackGuard::new();
    let callback = guard.make_guarded_callback(|x: u32| x + 1);

    let worker_callback = callback.clone();
    let before = thread::spawn(move || worker_callback.call((1,)))
        .join()
        .unwrap();
    assert_eq!(before, Some(2));

    drop(guard);

    let after = thread::spawn(move || callback.call((1,))).join().unwrap();
    assert_eq!(after, None);
}
