use std::fmt;

use tracing::trace;

use crate::{Empty, InvokeMut, InvokeOnce};

/// A callable wrapper that runs its callable at most once and ignores later calls.
///
/// The first [`call()`][Self::call] takes the callable out of the wrapper before running it, so
/// the wrapper is already empty while the body executes. A body that panics therefore still
/// counts as fired. Every later call (until the wrapper is re-armed with [`set()`][Self::set])
/// returns `None` without any effect.
///
/// The wrapper cannot be cloned, as that would duplicate the single permitted invocation. Use
/// [`take()`][Self::take] to move the armed callable into a new wrapper while emptying this one.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
///
/// use callback_contracts::CallOnceSilent;
///
/// let sum = Cell::new(0);
/// let mut once = CallOnceSilent::new(|a: u32, b: u32| sum.set(a + b));
///
/// assert_eq!(once.call((1, 2)), Some(()));
/// assert_eq!(once.call((10, 20)), None);
///
/// assert_eq!(sum.get(), 3);
/// ```
pub struct CallOnceSilent<F> {
    func: Option<F>,
}

impl<F> CallOnceSilent<F> {
    /// Creates a wrapper that holds no callable. Calls are ignored until one is assigned.
    #[must_use]
    #[inline]
    pub const fn empty() -> Self {
        Self { func: None }
    }

    /// Creates a wrapper armed with a callable.
    #[must_use]
    #[inline]
    pub const fn new(func: F) -> Self {
        Self { func: Some(func) }
    }

    /// Runs the callable if the wrapper is armed, leaving the wrapper empty.
    ///
    /// Returns the callable's result, or `None` if the wrapper was empty.
    pub fn call<Args>(&mut self, args: Args) -> Option<<F as InvokeOnce<Args>>::Output>
    where
        F: InvokeOnce<Args>,
    {
        let Some(func) = self.func.take() else {
            trace!("ignoring call to an empty single-fire callable");
            return None;
        };

        Some(func.invoke_once(args))
    }

    /// Arms the wrapper with a new callable, dropping any callable it held.
    #[inline]
    pub fn set(&mut self, func: F) {
        self.func = Some(func);
    }

    /// Drops the held callable without running it.
    #[inline]
    pub fn clear(&mut self) {
        self.func = None;
    }

    /// Moves the held callable (if any) into a new wrapper, leaving this one empty.
    #[must_use]
    #[inline]
    pub fn take(&mut self) -> Self {
        Self {
            func: self.func.take(),
        }
    }

    /// Whether the wrapper holds no callable.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.func.is_none()
    }

    /// Whether the wrapper holds a callable that has not run yet.
    #[must_use]
    #[inline]
    pub const fn is_armed(&self) -> bool {
        self.func.is_some()
    }
}

impl<F> Default for CallOnceSilent<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F> From<F> for CallOnceSilent<F> {
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

impl<F> PartialEq<Empty> for CallOnceSilent<F> {
    fn eq(&self, _other: &Empty) -> bool {
        self.is_empty()
    }
}

impl<F> PartialEq<CallOnceSilent<F>> for Empty {
    fn eq(&self, other: &CallOnceSilent<F>) -> bool {
        other.is_empty()
    }
}

impl<F> fmt::Debug for CallOnceSilent<F> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOnceSilent")
            .field("is_armed", &self.is_armed())
            .finish_non_exhaustive()
    }
}

impl<F, Args> InvokeOnce<Args> for CallOnceSilent<F>
where
    F: InvokeOnce<Args>,
{
    type Output = Option<F::Output>;

    fn invoke_once(mut self, args: Args) -> Self::Output {
        self.call(args)
    }
}

impl<F, Args> InvokeMut<Args> for CallOnceSilent<F>
where
    F: InvokeOnce<Args>,
{
    fn invoke_mut(&mut self, args: Args) -> Self::Output {
        self.call(args)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::Cell;
    use std::panic::{self, AssertUnwindSafe};

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(CallOnceSilent<fn()>: Send, Sync, Default);
    assert_not_impl_any!(CallOnceSilent<fn()>: Clone);
    assert_not_impl_any!(CallOnceSilent<Box<dyn FnOnce()>>: Send, Sync);

    #[test]
    fn void_call_runs_once() {
        let count = Cell::new(0);
        let mut once = CallOnceSilent::new(|| count.set(count.get() + 1));

        assert_eq!(count.get(), 0);

        once.call(());
        assert_eq!(count.get(), 1);

        once.call(());
        once.call(());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn call_with_arguments_runs_once() {
        let count = Cell::new(0);
        let mut once = CallOnceSilent::new(|_: i32, _: i32| count.set(count.get() + 1));

        once.call((1, 2));
        assert_eq!(count.get(), 1);

        once.call((2, 4));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn returns_result_then_none() {
        let mut once = CallOnceSilent::new(|a: u32, b: u32| a * b);

        assert_eq!(once.call((6, 7)), Some(42));
        assert_eq!(once.call((6, 7)), None);
        assert!(once.is_empty());
    }

    #[test]
    fn take_moves_armed_state() {
        let sum = Cell::new(0);
        let mut source = CallOnceSilent::new(|a: u32, b: u32| sum.set(a + b));

        let mut target = source.take();
        assert!(source == Empty);
        assert!(target != Empty);

        source.call((1, 1));
        assert_eq!(sum.get(), 0);

        target.call((1, 2));
        assert_eq!(sum.get(), 3);

        target.call((2, 4));
        assert_eq!(sum.get(), 3);
    }

    #[test]
    fn comparisons_with_empty() {
        let mut armed = CallOnceSilent::new(|_: i32, _: i32| ());
        assert!(armed != Empty);
        assert!(Empty != armed);

        armed.clear();
        assert!(armed == Empty);
        assert!(Empty == armed);

        let unarmed = CallOnceSilent::<fn(i32, i32)>::default();
        assert!(unarmed == Empty);
        assert!(!unarmed.is_armed());
    }

    #[test]
    fn rearm_after_firing() {
        let mut once: CallOnceSilent<fn() -> u8> = CallOnceSilent::new(|| 1);
        assert_eq!(once.call(()), Some(1));

        once.set(|| 2);
        assert!(once.is_armed());
        assert_eq!(once.call(()), Some(2));
        assert_eq!(once.call(()), None);
    }

    #[test]
    fn panicking_body_still_counts_as_fired() {
        let mut once = CallOnceSilent::new(|| -> u8 { panic!("callback failure") });

        let result = panic::catch_unwind(AssertUnwindSafe(|| once.call(())));
        assert!(result.is_err());

        assert!(once.is_empty());
        assert_eq!(once.call(()), None);
    }

    #[test]
    fn consumes_move_only_state() {
        let payload = vec![1, 2, 3];
        let mut once = CallOnceSilent::new(move || payload);

        assert_eq!(once.call(()), Some(vec![1, 2, 3]));
        assert_eq!(once.call(()), None);
    }

    #[test]
    fn nested_wrappers_fire_once() {
        let count = Cell::new(0);
        let inner = CallOnceSilent::new(|| count.set(count.get() + 1));
        let mut outer = CallOnceSilent::new(inner);

        assert_eq!(outer.call(()), Some(Some(())));
        assert_eq!(outer.call(()), None);
        assert_eq!(count.get(), 1);
    }
}
