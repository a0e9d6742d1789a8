//! Callbacks that refuse to run once the object that created them is gone.
//!
//! An object that hands out callbacks referring to itself embeds a [`CallbackGuard`] and creates
//! those callbacks through it. Each [`GuardedCallback`] observes the guard without keeping it
//! alive. When the guard is dropped together with its object, the callbacks stop invoking their
//! target and run their fallback (if one was supplied) instead.
//!
//! Liveness is checked when a call starts. A guard dropped on another thread while the target is
//! executing does not interrupt the target, so a target used across threads must still own (or
//! share ownership of) any state it touches.

use std::fmt;
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::{Invoke, InvokeMut, InvokeOnce};

/// Marks the lifetime of an object that hands out guarded callbacks.
///
/// Cloning a guard does not share its liveness: the clone is a fresh guard that belongs to the
/// cloned object, so callbacks created by the original stop running as soon as the original is
/// dropped, no matter how many clones exist. Likewise, [`clone_from()`][Clone::clone_from]
/// leaves the destination's own liveness untouched.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use callback_contracts::CallbackGuard;
///
/// struct Downloader {
///     guard: CallbackGuard,
///     completed: Rc<Cell<u32>>,
/// }
///
/// impl Downloader {
///     fn on_complete(&self) -> impl Fn() + use<> {
///         let completed = Rc::clone(&self.completed);
///         let callback = self
///             .guard
///             .make_guarded_callback(move || completed.set(completed.get() + 1));
///
///         move || {
///             callback.call(());
///         }
///     }
/// }
///
/// let completed = Rc::new(Cell::new(0));
/// let downloader = Downloader {
///     guard: CallbackGuard::new(),
///     completed: Rc::clone(&completed),
/// };
///
/// let on_complete = downloader.on_complete();
/// on_complete();
/// assert_eq!(completed.get(), 1);
///
/// drop(downloader);
/// on_complete();
/// assert_eq!(completed.get(), 1);
/// ```
pub struct CallbackGuard {
    cell: Arc<()>,
}

impl CallbackGuard {
    /// Creates a guard whose liveness lasts until it is dropped.
    #[must_use]
    pub fn new() -> Self {
        Self { cell: Arc::new(()) }
    }

    /// Returns an observer that reports whether this guard still exists.
    #[must_use]
    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            cell: Arc::downgrade(&self.cell),
        }
    }

    /// Wraps `target` so that it only runs while this guard exists.
    ///
    /// Calls made after the guard is dropped do nothing and return `None`.
    #[must_use]
    pub fn make_guarded_callback<F>(&self, target: F) -> GuardedCallback<F> {
        GuardedCallback {
            token: self.token(),
            target,
            fallback: None,
        }
    }

    /// Wraps `target` so that it only runs while this guard exists, running `fallback` in its
    /// place once the guard is gone.
    ///
    /// The fallback receives no arguments and its completion is reported to the caller of the
    /// guarded callback as `None`.
    #[must_use]
    pub fn make_guarded_callback_with_fallback<F, G>(
        &self,
        target: F,
        fallback: G,
    ) -> GuardedCallback<F, G> {
        GuardedCallback {
            token: self.token(),
            target,
            fallback: Some(fallback),
        }
    }
}

impl Default for CallbackGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CallbackGuard {
    fn clone(&self) -> Self {
        Self::new()
    }

    fn clone_from(&mut self, _source: &Self) {
        // Guards never adopt the liveness of another object.
    }
}

impl fmt::Debug for CallbackGuard {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackGuard")
            .field("observers", &Arc::weak_count(&self.cell))
            .finish()
    }
}

/// A non-owning observer of a [`CallbackGuard`].
///
/// A default-constructed token observes nothing and is never alive.
#[derive(Clone, Default)]
pub struct LivenessToken {
    cell: Weak<()>,
}

impl LivenessToken {
    /// Whether the guard this token was obtained from still exists.
    #[must_use]
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

impl fmt::Debug for LivenessToken {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessToken")
            .field("is_alive", &self.is_alive())
            .finish()
    }
}

/// A callback that only invokes its target while the guard it was created by exists.
///
/// Created by [`CallbackGuard::make_guarded_callback()`] or
/// [`CallbackGuard::make_guarded_callback_with_fallback()`]. Every call returns `Some` with the
/// target's result while the guard exists, and `None` afterwards. The target is never invoked
/// once the guard is gone.
///
/// The callback can be cloned when its target and fallback can. Clones observe the same guard.
#[derive(Clone)]
pub struct GuardedCallback<F, G = fn()> {
    token: LivenessToken,
    target: F,
    fallback: Option<G>,
}

impl<F, G> GuardedCallback<F, G> {
    /// Invokes the target through a shared reference if the guard still exists.
    pub fn call<Args>(&self, args: Args) -> Option<<F as InvokeOnce<Args>>::Output>
    where
        F: Invoke<Args>,
        G: Invoke<(), Output = ()>,
    {
        if self.token.is_alive() {
            return Some(self.target.invoke(args));
        }

        self.report_suppressed();

        if let Some(fallback) = &self.fallback {
            fallback.invoke(());
        }

        None
    }

    /// Invokes the target if the guard still exists, allowing it to mutate its captured state.
    pub fn call_mut<Args>(&mut self, args: Args) -> Option<<F as InvokeOnce<Args>>::Output>
    where
        F: InvokeMut<Args>,
        G: InvokeMut<(), Output = ()>,
    {
        if self.token.is_alive() {
            return Some(self.target.invoke_mut(args));
        }

        self.report_suppressed();

        if let Some(fallback) = &mut self.fallback {
            fallback.invoke_mut(());
        }

        None
    }

    /// Invokes the target if the guard still exists, consuming the callback.
    pub fn call_once<Args>(self, args: Args) -> Option<<F as InvokeOnce<Args>>::Output>
    where
        F: InvokeOnce<Args>,
        G: InvokeOnce<(), Output = ()>,
    {
        if self.token.is_alive() {
            return Some(self.target.invoke_once(args));
        }

        self.report_suppressed();

        if let Some(fallback) = self.fallback {
            fallback.invoke_once(());
        }

        None
    }

    /// Whether the guard this callback was created by still exists.
    #[must_use]
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.token.is_alive()
    }

    /// Whether a fallback runs in place of the target once the guard is gone.
    #[must_use]
    #[inline]
    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    fn report_suppressed(&self) {
        debug!(
            fallback = self.has_fallback(),
            "suppressing guarded callback because its guard no longer exists"
        );
    }
}

impl<F, G> fmt::Debug for GuardedCallback<F, G> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedCallback")
            .field("is_alive", &self.is_alive())
            .field("has_fallback", &self.has_fallback())
            .finish_non_exhaustive()
    }
}

impl<F, G, Args> InvokeOnce<Args> for GuardedCallback<F, G>
where
    F: InvokeOnce<Args>,
    G: InvokeOnce<(), Output = ()>,
{
    type Output = Option<F::Output>;

    fn invoke_once(self, args: Args) -> Self::Output {
        self.call_once(args)
    }
}

impl<F, G, Args> InvokeMut<Args> for GuardedCallback<F, G>
where
    F: InvokeMut<Args>,
    G: InvokeMut<(), Output = ()>,
{
    fn invoke_mut(&mut self, args: Args) -> Self::Output {
        self.call_mut(args)
    }
}

impl<F, G, Args> Invoke<Args> for GuardedCallback<F, G>
where
    F: Invoke<Args>,
    G: Invoke<(), Output = ()>,
{
    fn invoke(&self, args: Args) -> Self::Output {
        self.call(args)
    }
}
