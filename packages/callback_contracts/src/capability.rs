//! Traits describing what a callable can be invoked with.
//!
//! Stable Rust does not allow naming or implementing the `Fn*` traits generically over an
//! arbitrary argument list, so the wrappers in this crate express "invocable with `Args`" through
//! the traits in this module instead. Arguments are always passed as a tuple: `()` for no
//! arguments, `(a,)` for one argument, `(a, b)` for two and so on, up to eight arguments.
//!
//! Every closure, function and function pointer of a supported arity implements the traits that
//! match its `Fn*` flavor. The wrapper types of this crate implement them too, which is what
//! allows wrappers to be nested inside each other.
//!
//! A callable of the wrong arity or with the wrong argument types does not satisfy the bounds
//! and is rejected at compile time:
//!
//! ```compile_fail
//! use callback_contracts::CallOnceSilent;
//!
//! let mut once = CallOnceSilent::new(|a: u32, b: u32| a + b);
//! once.call(("not a number",));
//! ```

/// A callable that can be invoked at least once with the argument tuple `Args`.
///
/// # Example
///
/// ```rust
/// use callback_contracts::InvokeOnce;
///
/// fn run<F: InvokeOnce<(u32, u32), Output = u32>>(func: F) -> u32 {
///     func.invoke_once((2, 3))
/// }
///
/// assert_eq!(run(|a: u32, b: u32| a * b), 6);
/// ```
pub trait InvokeOnce<Args> {
    /// The value returned by the callable.
    type Output;

    /// Invokes the callable, consuming it.
    fn invoke_once(self, args: Args) -> Self::Output;
}

/// A callable that can be invoked any number of times through an exclusive reference.
pub trait InvokeMut<Args>: InvokeOnce<Args> {
    /// Invokes the callable, allowing it to mutate its captured state.
    fn invoke_mut(&mut self, args: Args) -> Self::Output;
}

/// A callable that can be invoked any number of times through a shared reference.
pub trait Invoke<Args>: InvokeMut<Args> {
    /// Invokes the callable.
    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_for_closures {
    ($($ty:ident $val:ident),*) => {
        impl<Func, Ret, $($ty,)*> InvokeOnce<($($ty,)*)> for Func
        where
            Func: FnOnce($($ty),*) -> Ret,
        {
            type Output = Ret;

            #[inline]
            fn invoke_once(self, ($($val,)*): ($($ty,)*)) -> Ret {
                self($($val),*)
            }
        }

        impl<Func, Ret, $($ty,)*> InvokeMut<($($ty,)*)> for Func
        where
            Func: FnMut($($ty),*) -> Ret,
        {
            #[inline]
            fn invoke_mut(&mut self, ($($val,)*): ($($ty,)*)) -> Ret {
                self($($val),*)
            }
        }

        impl<Func, Ret, $($ty,)*> Invoke<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret,
        {
            #[inline]
            fn invoke(&self, ($($val,)*): ($($ty,)*)) -> Ret {
                self($($val),*)
            }
        }
    };
}

impl_for_closures!();
impl_for_closures!(A1 a1);
impl_for_closures!(A1 a1, A2 a2);
impl_for_closures!(A1 a1, A2 a2, A3 a3);
impl_for_closures!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_for_closures!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_for_closures!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);
impl_for_closures!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7);
impl_for_closures!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6, A7 a7, A8 a8);
