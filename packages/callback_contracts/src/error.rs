use thiserror::Error;

/// Errors reported when a callable wrapper cannot honor an invocation.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The wrapper was invoked or accessed while it held no callable.
    ///
    /// Reported by the shared-ownership handles when they have been cleared or were never
    /// assigned, and by [`CallOnceStrict`][crate::CallOnceStrict] once it has fired.
    #[error("invoked a callable wrapper that holds no target")]
    EmptyTarget,

    /// A shared callable was invoked or accessed while it was already executing or borrowed
    /// further up the same thread's call stack.
    #[error("shared callable was re-entered while it was already executing or borrowed")]
    Reentered,
}

/// A specialized `Result` type for callable wrapper operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
