//! Actions that run when the last handle referencing them goes away.
//!
//! An expiry action is shared by all clones of its handle. It runs exactly once, at whichever of
//! these happens first:
//!
//! * the last handle is dropped (which includes overwriting the variable that held it),
//! * any handle calls `release()`.
//!
//! # Panicking actions
//!
//! A panic raised by the action propagates out of the operation that fired it: `release()`, or
//! the drop of the last handle. Dropping the last handle while the thread is already unwinding
//! from another panic and having the action panic again aborts the process, like any other
//! panicking destructor. Actions that can fail should handle the failure themselves.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::ERR_POISONED_LOCK;

type SyncAction = Box<dyn FnOnce() + Send>;
type LocalAction = Box<dyn FnOnce()>;

const REASON_RELEASE: &str = "release";
const REASON_LAST_HANDLE: &str = "last handle dropped";

/// The shared cell behind [`ExpiryAction`]. Fires the action when dropped, unless already fired.
struct Trigger {
    // The lock is never held while the action runs, so it cannot be poisoned by the action.
    action: Mutex<Option<SyncAction>>,
}

impl Trigger {
    fn fire(&self) {
        let action = self.action.lock().expect(ERR_POISONED_LOCK).take();

        if let Some(action) = action {
            trace!(reason = REASON_RELEASE, "firing expiry action");
            action();
        }
    }

    fn is_pending(&self) -> bool {
        self.action.lock().expect(ERR_POISONED_LOCK).is_some()
    }
}

impl Drop for Trigger {
    fn drop(&mut self) {
        let action = self.action.get_mut().expect(ERR_POISONED_LOCK).take();

        if let Some(action) = action {
            trace!(reason = REASON_LAST_HANDLE, "firing expiry action");
            action();
        }
    }
}

/// A thread-safe handle to an action that runs once, when the last handle expires.
///
/// Clones share the same pending action. Handles may be cloned into other threads and the
/// action runs on whichever thread drops the last handle (or calls
/// [`release()`][Self::release]).
///
/// # Panics
///
/// A panic raised by the action propagates out of whichever operation fired it. If the last
/// handle is dropped during unwinding from another panic and the action panics too, the process
/// aborts.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// use callback_contracts::ExpiryAction;
///
/// let fired = Arc::new(AtomicBool::new(false));
///
/// let first = ExpiryAction::new({
///     let fired = Arc::clone(&fired);
///     move || fired.store(true, Ordering::Relaxed)
/// });
/// let second = first.clone();
///
/// drop(first);
/// assert!(!fired.load(Ordering::Relaxed));
///
/// drop(second);
/// assert!(fired.load(Ordering::Relaxed));
/// ```
#[derive(Clone, Default)]
pub struct ExpiryAction {
    trigger: Option<Arc<Trigger>>,
}

impl ExpiryAction {
    /// Creates a handle with no action. Cloning and dropping it has no effect.
    #[must_use]
    #[inline]
    pub const fn empty() -> Self {
        Self { trigger: None }
    }

    /// Creates the first handle to a new expiry action.
    #[must_use]
    pub fn new<A>(action: A) -> Self
    where
        A: FnOnce() + Send + 'static,
    {
        Self {
            trigger: Some(Arc::new(Trigger {
                action: Mutex::new(Some(Box::new(action))),
            })),
        }
    }

    /// Runs the action now if it has not run yet, regardless of how many handles remain.
    ///
    /// Calling this again, through this or any other handle, has no effect.
    ///
    /// # Panics
    ///
    /// Propagates any panic raised by the action.
    pub fn release(&self) {
        if let Some(trigger) = &self.trigger {
            trigger.fire();
        }
    }

    /// Whether an action is attached and has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.trigger.as_ref().is_some_and(|trigger| trigger.is_pending())
    }

    /// Whether this handle was created without an action.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.trigger.is_none()
    }

    /// The number of handles sharing this handle's action, including this one.
    ///
    /// Returns zero for an empty handle.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.trigger.as_ref().map_or(0, Arc::strong_count)
    }
}

impl fmt::Debug for ExpiryAction {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiryAction")
            .field("is_pending", &self.is_pending())
            .field("handle_count", &self.handle_count())
            .finish_non_exhaustive()
    }
}

/// The shared cell behind [`LocalExpiryAction`].
struct LocalTrigger {
    action: RefCell<Option<LocalAction>>,
}

impl LocalTrigger {
    fn fire(&self) {
        // The borrow ends before the action runs, so the action may touch its own handles.
        let action = self.action.borrow_mut().take();

        if let Some(action) = action {
            trace!(reason = REASON_RELEASE, "firing local expiry action");
            action();
        }
    }
}

impl Drop for LocalTrigger {
    fn drop(&mut self) {
        if let Some(action) = self.action.get_mut().take() {
            trace!(reason = REASON_LAST_HANDLE, "firing local expiry action");
            action();
        }
    }
}

/// A single-threaded handle to an action that runs once, when the last handle expires.
///
/// Behaves like [`ExpiryAction`] but accepts actions that are not `Send` and uses a
/// non-atomic reference count.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use callback_contracts::LocalExpiryAction;
///
/// let fired = Rc::new(Cell::new(false));
///
/// {
///     let fired = Rc::clone(&fired);
///     let _cleanup = LocalExpiryAction::new(move || fired.set(true));
/// }
///
/// assert!(fired.get());
/// ```
#[derive(Clone, Default)]
pub struct LocalExpiryAction {
    trigger: Option<Rc<LocalTrigger>>,
}

impl LocalExpiryAction {
    /// Creates a handle with no action. Cloning and dropping it has no effect.
    #[must_use]
    #[inline]
    pub const fn empty() -> Self {
        Self { trigger: None }
    }

    /// Creates the first handle to a new expiry action.
    #[must_use]
    pub fn new<A>(action: A) -> Self
    where
        A: FnOnce() + 'static,
    {
        Self {
            trigger: Some(Rc::new(LocalTrigger {
                action: RefCell::new(Some(Box::new(action))),
            })),
        }
    }

    /// Runs the action now if it has not run yet, regardless of how many handles remain.
    ///
    /// Calling this again, through this or any other handle, has no effect.
    ///
    /// # Panics
    ///
    /// Propagates any panic raised by the action.
    pub fn release(&self) {
        if let Some(trigger) = &self.trigger {
            trigger.fire();
        }
    }

    /// Whether an action is attached and has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.trigger
            .as_ref()
            .is_some_and(|trigger| trigger.action.borrow().is_some())
    }

    /// Whether this handle was created without an action.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.trigger.is_none()
    }

    /// The number of handles sharing this handle's action, including this one.
    ///
    /// Returns zero for an empty handle.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.trigger.as_ref().map_or(0, Rc::strong_count)
    }
}

impl fmt::Debug for LocalExpiryAction {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalExpiryAction")
            .field("is_pending", &self.is_pending())
            .field("handle_count", &self.handle_count())
            .finish_non_exhaustive()
    }
}
