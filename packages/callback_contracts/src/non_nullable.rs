use std::fmt;
use std::mem;

use crate::{Empty, Invoke, InvokeMut, InvokeOnce};

/// A callable handle that is never empty.
///
/// Accepting a `NotEmptyFn` parameter makes it obvious to the reader that the callee will not
/// check for a missing callback and that supplying one is the caller's responsibility. Returning
/// one tells the caller that no check is needed.
///
/// There is no `Default` implementation and no operation that clears the handle. Assigning a new
/// callable with [`set()`][Self::set] replaces the old one. A Rust move leaves nothing behind that
/// could be observed, so a moved-from handle can never be seen empty; cloning (when `F: Clone`)
/// produces an independent handle with its own copy of the callable.
///
/// Comparisons against [`Empty`] exist to document the guarantee and always report "not empty".
///
/// The guarantee covers the handle, not what the callable does when invoked. Wrapping a
/// callable that is itself an empty wrapper of this crate, such as [`SharedFn::empty()`] or a
/// [`CallOnceStrict`] that already fired, produces a handle that compares as not empty while
/// every call returns that wrapper's [`Error::EmptyTarget`]. Wrap such values only once they
/// hold a callable, or wrap the callable they would hold instead.
///
/// [`SharedFn::empty()`]: crate::SharedFn::empty
/// [`CallOnceStrict`]: crate::CallOnceStrict
/// [`Error::EmptyTarget`]: crate::Error::EmptyTarget
///
/// # Example
///
/// ```rust
/// use callback_contracts::NotEmptyFn;
///
/// struct Squarer {
///     func: NotEmptyFn<fn(i32) -> i32>,
/// }
///
/// impl Squarer {
///     fn run(&self, x: i32) -> i32 {
///         // No emptiness check is needed here.
///         self.func.call((x,))
///     }
/// }
///
/// let squarer = Squarer {
///     func: NotEmptyFn::new(|x: i32| x * x),
/// };
///
/// assert_eq!(squarer.run(3), 9);
/// ```
#[derive(Clone)]
pub struct NotEmptyFn<F> {
    func: F,
}

impl<F> NotEmptyFn<F> {
    /// Wraps a callable.
    #[must_use]
    #[inline]
    pub const fn new(func: F) -> Self {
        Self { func }
    }

    /// Wraps a callable that the caller has promised is present.
    ///
    /// # Panics
    ///
    /// Panics if `func` is `None`. Constructing a non-empty handle from an absent callable is a
    /// programming error, not a recoverable condition.
    #[must_use]
    #[track_caller]
    pub fn from_option(func: Option<F>) -> Self {
        let Some(func) = func else {
            panic!("NotEmptyFn cannot be constructed from an absent callable");
        };

        Self::new(func)
    }

    /// Invokes the callable through a shared reference.
    #[inline]
    pub fn call<Args>(&self, args: Args) -> <F as InvokeOnce<Args>>::Output
    where
        F: Invoke<Args>,
    {
        self.func.invoke(args)
    }

    /// Invokes the callable, allowing it to mutate its captured state.
    #[inline]
    pub fn call_mut<Args>(&mut self, args: Args) -> <F as InvokeOnce<Args>>::Output
    where
        F: InvokeMut<Args>,
    {
        self.func.invoke_mut(args)
    }

    /// Invokes the callable, consuming the handle.
    #[inline]
    pub fn call_once<Args>(self, args: Args) -> <F as InvokeOnce<Args>>::Output
    where
        F: InvokeOnce<Args>,
    {
        self.func.invoke_once(args)
    }

    /// Replaces the held callable, dropping the previous one.
    #[inline]
    pub fn set(&mut self, func: F) {
        self.func = func;
    }

    /// Exchanges the callables held by two handles.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.func, &mut other.func);
    }

    /// Returns a reference to the held callable.
    #[must_use]
    #[inline]
    pub const fn get(&self) -> &F {
        &self.func
    }

    /// Returns an exclusive reference to the held callable.
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self) -> &mut F {
        &mut self.func
    }

    /// Unwraps the handle, returning the callable.
    #[must_use]
    #[inline]
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<F> From<F> for NotEmptyFn<F> {
    #[inline]
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

impl<F> PartialEq<Empty> for NotEmptyFn<F> {
    #[inline]
    fn eq(&self, _other: &Empty) -> bool {
        false
    }
}

impl<F> PartialEq<NotEmptyFn<F>> for Empty {
    #[inline]
    fn eq(&self, _other: &NotEmptyFn<F>) -> bool {
        false
    }
}

impl<F> fmt::Debug for NotEmptyFn<F> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotEmptyFn").finish_non_exhaustive()
    }
}

impl<F, Args> InvokeOnce<Args> for NotEmptyFn<F>
where
    F: InvokeOnce<Args>,
{
    type Output = F::Output;

    #[inline]
    fn invoke_once(self, args: Args) -> Self::Output {
        self.call_once(args)
    }
}

impl<F, Args> InvokeMut<Args> for NotEmptyFn<F>
where
    F: InvokeMut<Args>,
{
    #[inline]
    fn invoke_mut(&mut self, args: Args) -> Self::Output {
        self.call_mut(args)
    }
}

impl<F, Args> Invoke<Args> for NotEmptyFn<F>
where
    F: Invoke<Args>,
{
    #[inline]
    fn invoke(&self, args: Args) -> Self::Output {
        self.call(args)
    }
}
