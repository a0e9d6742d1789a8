//! Helpers shared by the unit tests of this crate.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::time::Duration;
use std::{env, thread};

/// Counts invocations of the callables it hands out, from any thread.
#[derive(Clone, Debug, Default)]
pub(crate) struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of times any callable obtained from this counter (or its clones) was invoked.
    pub(crate) fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    /// Returns a callable that increments the counter each time it is invoked.
    pub(crate) fn increment_fn(&self) -> impl Fn() + Send + Sync + 'static {
        let count = Arc::clone(&self.count);

        move || {
            count.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Runs a multi-threaded test body with a timeout, so that a deadlock fails the test instead of
/// hanging the test run.
///
/// When the `MUTATION_TESTING` environment variable is set to "1", the body runs directly so
/// that mutation testing can detect hanging mutations.
pub(crate) fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    if env::var("MUTATION_TESTING").as_deref() == Ok("1") {
        return test_fn();
    }

    let (tx, rx) = mpsc::channel();

    let test_handle = thread::spawn(move || {
        // The receiver is gone if the watchdog already gave up.
        drop(tx.send(test_fn()));
    });

    let timeout = if cfg!(miri) {
        Duration::from_secs(60)
    } else {
        Duration::from_secs(10)
    };

    match rx.recv_timeout(timeout) {
        Ok(result) => {
            test_handle.join().expect("test thread completed after sending its result");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded the {timeout:?} watchdog timeout");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => match test_handle.join() {
            Ok(()) => panic!("test thread disconnected without a result"),
            Err(payload) => panic::resume_unwind(payload),
        },
    }
}
