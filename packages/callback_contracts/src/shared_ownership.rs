//! Callable handles with shared ownership of a single callable.
//!
//! Cloning a handle does not clone the callable. All clones refer to the same cell, so captured
//! state mutated by a call through one handle is observed by calls through every other handle.
//!
//! Two variants are available:
//!
//! * [`SharedFn`] keeps the callable behind an atomically reference-counted reentrant mutex.
//!   Handles can be sent to and dropped on any thread as long as the callable is `Send`.
//! * [`LocalSharedFn`] keeps the callable behind a single-threaded reference count with no
//!   locking.
//!
//! Both report a call made while the same thread is already executing the callable as
//! [`Error::Reentered`] instead of blocking.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::{ERR_VACATED_GUARD, Empty, Error, Invoke, InvokeMut, InvokeOnce, Result};

/// A thread-safe callable handle whose clones share one callable.
///
/// The handle may be empty, either because it was created with [`empty()`][Self::empty] or
/// because it was [cleared][Self::clear]. Invoking an empty handle returns
/// [`Error::EmptyTarget`].
///
/// Calls through handles on different threads are serialized: a call waits until a call in
/// progress on another thread completes. A call made on the same thread while the callable is
/// already executing (the callable calling back into a handle sharing its own cell) or while a
/// guard from [`get()`][Self::get] is alive returns [`Error::Reentered`] instead of waiting.
///
/// A callable that panics stays in the cell and can be invoked again through any handle. Its
/// captured state is whatever the panicking call left behind.
///
/// # Example
///
/// ```rust
/// use callback_contracts::SharedFn;
///
/// let mut total = 0;
/// let accumulate = SharedFn::new(move |a: i32, b: i32| {
///     total += a + b;
///     total
/// });
///
/// let other = accumulate.clone();
///
/// assert_eq!(accumulate.call((2, 4)), Ok(6));
/// assert_eq!(other.call((2, 1)), Ok(9));
/// ```
pub struct SharedFn<F> {
    // The slot is vacated while a call or a guard holds the callable.
    cell: Option<Arc<ReentrantMutex<RefCell<Option<F>>>>>,
}

impl<F> SharedFn<F> {
    /// Creates a handle that holds no callable.
    #[must_use]
    #[inline]
    pub const fn empty() -> Self {
        Self { cell: None }
    }

    /// Places the callable into a newly allocated shared cell.
    #[must_use]
    pub fn new(func: F) -> Self {
        Self {
            cell: Some(Arc::new(ReentrantMutex::new(RefCell::new(Some(func))))),
        }
    }

    /// Invokes the shared callable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTarget`] if the handle holds no callable.
    ///
    /// Returns [`Error::Reentered`] if the callable is already executing or borrowed further up
    /// the current thread's call stack.
    pub fn call<Args>(&self, args: Args) -> Result<<F as InvokeOnce<Args>>::Output>
    where
        F: InvokeMut<Args>,
    {
        let mut func = self.get()?;
        Ok((*func).invoke_mut(args))
    }

    /// Grants exclusive access to the shared callable for in-place mutation.
    ///
    /// Changes made through the returned guard are visible through every handle sharing the
    /// cell. Calls through handles on other threads wait until the guard is dropped; calls on the
    /// current thread return [`Error::Reentered`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTarget`] if the handle holds no callable.
    ///
    /// Returns [`Error::Reentered`] if the callable is already executing or borrowed further up
    /// the current thread's call stack.
    pub fn get(&self) -> Result<SharedFnGuard<'_, F>> {
        let cell = self.cell.as_ref().ok_or(Error::EmptyTarget)?;

        let slot = cell.lock();

        // The slot is only borrowed for the duration of this statement and in the guard's drop,
        // never while user code runs.
        let Some(func) = slot.borrow_mut().take() else {
            return Err(Error::Reentered);
        };

        Ok(SharedFnGuard {
            slot,
            func: Some(func),
        })
    }

    /// Places a new callable into a new cell, detaching this handle from any previous one.
    ///
    /// Other handles that shared the previous cell keep using the previous callable.
    pub fn set(&mut self, func: F) {
        *self = Self::new(func);
    }

    /// Detaches this handle from its cell, leaving it empty.
    ///
    /// Other handles that shared the cell are not affected. The callable is dropped once the
    /// last handle referencing it is detached or dropped.
    pub fn clear(&mut self) {
        self.cell = None;
    }

    /// Exchanges the cells referenced by two handles.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.cell, &mut other.cell);
    }

    /// Whether this handle holds no callable.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.cell.is_none()
    }

    /// The number of handles sharing this handle's cell, including this one.
    ///
    /// Returns zero for an empty handle.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.cell.as_ref().map_or(0, Arc::strong_count)
    }

    /// Whether both handles reference the same cell.
    ///
    /// Two empty handles do not share a cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.cell, &other.cell) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Exclusive access to the callable of a [`SharedFn`], obtained from [`SharedFn::get()`].
///
/// The callable is returned to its cell when the guard is dropped, including when the thread
/// is unwinding from a panic.
pub struct SharedFnGuard<'a, F> {
    slot: ReentrantMutexGuard<'a, RefCell<Option<F>>>,
    func: Option<F>,
}

impl<F> Deref for SharedFnGuard<'_, F> {
    type Target = F;

    fn deref(&self) -> &F {
        self.func.as_ref().expect(ERR_VACATED_GUARD)
    }
}

impl<F> DerefMut for SharedFnGuard<'_, F> {
    fn deref_mut(&mut self) -> &mut F {
        self.func.as_mut().expect(ERR_VACATED_GUARD)
    }
}

impl<F> Drop for SharedFnGuard<'_, F> {
    fn drop(&mut self) {
        // Runs before the lock is released, so no other thread can observe the vacant slot.
        *self.slot.borrow_mut() = self.func.take();
    }
}

impl<F> fmt::Debug for SharedFnGuard<'_, F> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFnGuard").finish_non_exhaustive()
    }
}

impl<F> Clone for SharedFn<F> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.as_ref().map(Arc::clone),
        }
    }
}

impl<F> Default for SharedFn<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F> From<F> for SharedFn<F> {
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

impl<F> PartialEq<Empty> for SharedFn<F> {
    fn eq(&self, _other: &Empty) -> bool {
        self.is_empty()
    }
}

impl<F> PartialEq<SharedFn<F>> for Empty {
    fn eq(&self, other: &SharedFn<F>) -> bool {
        other.is_empty()
    }
}

impl<F> fmt::Debug for SharedFn<F> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFn")
            .field("is_empty", &self.is_empty())
            .field("handle_count", &self.handle_count())
            .finish_non_exhaustive()
    }
}

impl<F, Args> InvokeOnce<Args> for SharedFn<F>
where
    F: InvokeMut<Args>,
{
    type Output = Result<F::Output>;

    fn invoke_once(self, args: Args) -> Self::Output {
        self.call(args)
    }
}

impl<F, Args> InvokeMut<Args> for SharedFn<F>
where
    F: InvokeMut<Args>,
{
    fn invoke_mut(&mut self, args: Args) -> Self::Output {
        self.call(args)
    }
}

impl<F, Args> Invoke<Args> for SharedFn<F>
where
    F: InvokeMut<Args>,
{
    fn invoke(&self, args: Args) -> Self::Output {
        self.call(args)
    }
}

/// A single-threaded callable handle whose clones share one callable.
///
/// Behaves like [`SharedFn`] but uses a non-atomic reference count and a borrow flag instead of
/// a mutex. If the callable calls back into a handle sharing its own cell, the inner call
/// returns [`Error::Reentered`] rather than blocking or panicking.
///
/// # Example
///
/// ```rust
/// use callback_contracts::{Empty, LocalSharedFn};
///
/// let mut count = 0;
/// let mut handle = LocalSharedFn::new(move || {
///     count += 1;
///     count
/// });
///
/// let other = handle.clone();
/// assert_eq!(handle.call(()), Ok(1));
///
/// handle.clear();
/// assert!(handle == Empty);
/// assert_eq!(other.call(()), Ok(2));
/// ```
pub struct LocalSharedFn<F> {
    cell: Option<Rc<RefCell<F>>>,
}

impl<F> LocalSharedFn<F> {
    /// Creates a handle that holds no callable.
    #[must_use]
    #[inline]
    pub const fn empty() -> Self {
        Self { cell: None }
    }

    /// Places the callable into a newly allocated shared cell.
    #[must_use]
    pub fn new(func: F) -> Self {
        Self {
            cell: Some(Rc::new(RefCell::new(func))),
        }
    }

    /// Invokes the shared callable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTarget`] if the handle holds no callable.
    ///
    /// Returns [`Error::Reentered`] if the callable is already executing or borrowed through a
    /// handle sharing the same cell.
    pub fn call<Args>(&self, args: Args) -> Result<<F as InvokeOnce<Args>>::Output>
    where
        F: InvokeMut<Args>,
    {
        let mut func = self.get()?;
        Ok((*func).invoke_mut(args))
    }

    /// Grants exclusive access to the shared callable for in-place mutation.
    ///
    /// Changes made through the returned guard are visible through every handle sharing the
    /// cell. While the guard is alive, calls through any handle sharing the cell return
    /// [`Error::Reentered`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTarget`] if the handle holds no callable.
    ///
    /// Returns [`Error::Reentered`] if the callable is already executing or borrowed.
    pub fn get(&self) -> Result<RefMut<'_, F>> {
        let cell = self.cell.as_ref().ok_or(Error::EmptyTarget)?;

        let Ok(func) = cell.try_borrow_mut() else {
            return Err(Error::Reentered);
        };

        Ok(func)
    }

    /// Places a new callable into a new cell, detaching this handle from any previous one.
    ///
    /// Other handles that shared the previous cell keep using the previous callable.
    pub fn set(&mut self, func: F) {
        *self = Self::new(func);
    }

    /// Detaches this handle from its cell, leaving it empty.
    ///
    /// Other handles that shared the cell are not affected.
    pub fn clear(&mut self) {
        self.cell = None;
    }

    /// Exchanges the cells referenced by two handles.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.cell, &mut other.cell);
    }

    /// Whether this handle holds no callable.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.cell.is_none()
    }

    /// The number of handles sharing this handle's cell, including this one.
    ///
    /// Returns zero for an empty handle.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.cell.as_ref().map_or(0, Rc::strong_count)
    }

    /// Whether both handles reference the same cell.
    ///
    /// Two empty handles do not share a cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.cell, &other.cell) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<F> Clone for LocalSharedFn<F> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.as_ref().map(Rc::clone),
        }
    }
}

impl<F> Default for LocalSharedFn<F> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<F> From<F> for LocalSharedFn<F> {
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

impl<F> PartialEq<Empty> for LocalSharedFn<F> {
    fn eq(&self, _other: &Empty) -> bool {
        self.is_empty()
    }
}

impl<F> PartialEq<LocalSharedFn<F>> for Empty {
    fn eq(&self, other: &LocalSharedFn<F>) -> bool {
        other.is_empty()
    }
}

impl<F> fmt::Debug for LocalSharedFn<F> {
    #[cfg_attr(test, mutants::skip)] // No API contract for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSharedFn")
            .field("is_empty", &self.is_empty())
            .field("handle_count", &self.handle_count())
            .finish_non_exhaustive()
    }
}

impl<F, Args> InvokeOnce<Args> for LocalSharedFn<F>
where
    F: InvokeMut<Args>,
{
    type Output = Result<F::Output>;

    fn invoke_once(self, args: Args) -> Self::Output {
        self.call(args)
    }
}

impl<F, Args> InvokeMut<Args> for LocalSharedFn<F>
where
    F: InvokeMut<Args>,
{
    fn invoke_mut(&mut self, args: Args) -> Self::Output {
        self.call(args)
    }
}

impl<F, Args> Invoke<Args> for LocalSharedFn<F>
where
    F: InvokeMut<Args>,
{
    fn invoke(&self, args: Args) -> Self::Output {
        self.call(args)
    }
}
