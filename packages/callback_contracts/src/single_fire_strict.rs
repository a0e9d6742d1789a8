use std::fmt;

use crate::{Empty, Error, InvokeMut, InvokeOnce, Result};

/// A callable wrapper that runs its callable at most once and rejects calls once it is empty.
///
/// Follows the same firing rule as [`CallOnceSilent`][crate::CallOnceSilent]: the callable is
/// taken out of the wrapper before it runs. Unlike the silent variant, calling an empty wrapper
/// is reported as [`Error::EmptyTarget`] so that a double invocation is visible to the caller.
///
/// The wrapper can be cloned when the callable can. Each clone holds its own copy of the callable
/// and fires independently of the others.
///
/// # Example
///
/// ```rust
/// use callback_contracts::{Error, call_once_strict};
///
/// let mut once = call_once_strict(|name: &str| format!("hello, {name}"));
///
/// assert_eq!(once.call(("world",)).unwrap(), "hello, world");
/// assert_eq!(once.call(("again",)), Err(Error::EmptyTarget));
/// ```
#[derive(Clone)]
pub struct CallOnceStrict<F> {
    func: Option<F>,
}

impl<F> CallOnceStrict<F> {
    /// Creates a wrapper that holds no callable.
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

    /// Runs the callable, leaving the wrapper empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTarget`] if the wrapper holds no callable, either because it was
    /// never armed or because it already fired.
    pub fn call<Args>(&mut self, args: Args) -> Result<<F as InvokeOnce<Args>>::Output>
    where
        F: InvokeOnce<Args>,
    {
        let func = self.func.take().ok_or(Error::EmptyTarget)?;

        Ok(func.invoke_once(args))
    }

    /// Whether the wrapper holds a callable that has not run yet.
    #[must_use]
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.func.is_some()
    }

    /// Extracts the held callable without running it, leaving the wrapper empty.
    #[must_use]
    #[inline]
    pub fn release(&mut self) -> Option<F> {
        self.func.take()
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
}

/// Creates a [`CallOnceStrict`] armed with `func`.
#[must_use]
#[inline]
pub const fn call_once_strict<F>(func: F) -> CallOnceStrict<F> {
    CallOnceStrict::new(func)
}

impl<F> Default for CallOnceStrict<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F> From<F> for CallOnceStrict<F> {
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

impl<F> PartialEq<Empty> for CallOnceStrict<F> {
    fn eq(&self, _other: &Empty) -> bool {
        !self.is_valid()
    }
}

impl<F> PartialEq<CallOnceStrict<F>> for Empty {
    fn eq(&self, other: &CallOnceStrict<F>) -> bool {
        !other.is_valid()
    }
}

impl<F> fmt::Debug for CallOnceStrict<F> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallOnceStrict")
            .field("is_valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}

impl<F, Args> InvokeOnce<Args> for CallOnceStrict<F>
where
    F: InvokeOnce<Args>,
{
    type Output = Result<F::Output>;

    fn invoke_once(mut self, args: Args) -> Self::Output {
        self.call(args)
    }
}

impl<F, Args> InvokeMut<Args> for CallOnceStrict<F>
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

    assert_impl_all!(CallOnceStrict<fn()>: Send, Sync, Clone, Default);
    assert_not_impl_any!(CallOnceStrict<Box<dyn FnOnce()>>: Send, Sync, Clone);

    #[test]
    fn fires_once_then_reports_empty() {
        let count = Cell::new(0);
        let mut once = CallOnceStrict::new(|| count.set(count.get() + 1));

        assert!(once.is_valid());
        assert_eq!(once.call(()), Ok(()));
        assert_eq!(count.get(), 1);

        assert!(!once.is_valid());
        assert_eq!(once.call(()), Err(Error::EmptyTarget));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn never_armed_reports_empty() {
        let mut once = CallOnceStrict::<fn(u8) -> u8>::default();

        assert!(once == Empty);
        assert_eq!(once.call((1,)), Err(Error::EmptyTarget));
    }

    #[test]
    fn clones_fire_independently() {
        let count = Cell::new(0);
        let mut first = CallOnceStrict::new(|step: u32| count.set(count.get() + step));
        let mut second = first.clone();

        first.call((1,)).unwrap();
        assert_eq!(first.call((1,)), Err(Error::EmptyTarget));

        second.call((10,)).unwrap();
        assert_eq!(second.call((10,)), Err(Error::EmptyTarget));

        assert_eq!(count.get(), 11);
    }

    #[test]
    fn clone_of_fired_wrapper_is_empty() {
        let mut once = call_once_strict(|| 5);
        assert_eq!(once.call(()), Ok(5));

        let mut copy = once.clone();
        assert!(copy == Empty);
        assert_eq!(copy.call(()), Err(Error::EmptyTarget));
    }

    #[test]
    fn release_extracts_without_running() {
        let count = Cell::new(0);
        let mut once = CallOnceStrict::new(|| {
            count.set(count.get() + 1);
            count.get()
        });

        let func = once.release().unwrap();
        assert_eq!(count.get(), 0);
        assert!(Empty == once);
        assert!(once.release().is_none());

        assert_eq!(func(), 1);
    }

    #[test]
    fn rearm_after_firing() {
        let mut once: CallOnceStrict<fn(u32) -> u32> = CallOnceStrict::new(|x: u32| x + 1);
        assert_eq!(once.call((1,)), Ok(2));

        once.set(|x: u32| x + 2);
        assert!(once != Empty);
        assert_eq!(once.call((1,)), Ok(3));
    }

    #[test]
    fn take_moves_armed_state() {
        let mut source = CallOnceStrict::new(|| "fired");

        let mut target = source.take();

        assert_eq!(source.call(()), Err(Error::EmptyTarget));
        assert_eq!(target.call(()), Ok("fired"));
    }

    #[test]
    fn clear_disarms() {
        let mut once = CallOnceStrict::new(|| ());
        once.clear();

        assert_eq!(once.call(()), Err(Error::EmptyTarget));
    }

    #[test]
    fn panicking_body_still_counts_as_fired() {
        let mut once = CallOnceStrict::new(|| -> u8 { panic!("callback failure") });

        let result = panic::catch_unwind(AssertUnwindSafe(|| once.call(())));
        assert!(result.is_err());

        assert_eq!(once.call(()), Err(Error::EmptyTarget));
    }
}
