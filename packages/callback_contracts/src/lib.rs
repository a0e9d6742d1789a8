#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Wrappers that attach lifetime and invocation-cardinality contracts to callbacks.
//!
//! A plain closure says nothing about how often it may run, who owns it or whether the object it
//! refers to still exists. The types in this crate make each of those contracts explicit at the
//! type level:
//!
//! * [`NotEmptyFn`] - a callable handle that can never be empty.
//! * [`SharedFn`] / [`LocalSharedFn`] - handles whose clones share one callable, including any
//!   state it captures.
//! * [`CallOnceSilent`] - runs its callable at most once; later calls are ignored.
//! * [`CallOnceStrict`] - runs its callable at most once; later calls return
//!   [`Error::EmptyTarget`].
//! * [`ExpiryAction`] / [`LocalExpiryAction`] - runs an action once, when the last handle
//!   referencing it goes away or when any handle releases it.
//! * [`CallbackGuard`] / [`GuardedCallback`] - callbacks that stop invoking their target once the
//!   object that created them is dropped.
//!
//! Whether a callable fits a wrapper is expressed by the [`InvokeOnce`], [`InvokeMut`] and
//! [`Invoke`] traits, which take the argument list as a tuple. Every wrapper implements them too,
//! so wrappers can be nested inside each other.
//!
//! The crate emits `tracing` events at `trace` and `debug` level. It never installs a subscriber.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use callback_contracts::{CallOnceSilent, ExpiryAction, SharedFn};
//!
//! let cleanups = Arc::new(AtomicUsize::new(0));
//!
//! let cleanup = ExpiryAction::new({
//!     let cleanups = Arc::clone(&cleanups);
//!     move || {
//!         cleanups.fetch_add(1, Ordering::Relaxed);
//!     }
//! });
//!
//! // Every clone of the handle shares the same callable and the same pending cleanup.
//! let on_message = SharedFn::new(move |len: usize| {
//!     let _keep_alive = &cleanup;
//!     len * 2
//! });
//! let on_message_clone = on_message.clone();
//!
//! assert_eq!(on_message.call((4,)), Ok(8));
//! assert_eq!(on_message_clone.call((5,)), Ok(10));
//!
//! let mut on_first_message = CallOnceSilent::new(|len: usize| len);
//! assert_eq!(on_first_message.call((1,)), Some(1));
//! assert_eq!(on_first_message.call((2,)), None);
//!
//! drop(on_message);
//! assert_eq!(cleanups.load(Ordering::Relaxed), 0);
//!
//! drop(on_message_clone);
//! assert_eq!(cleanups.load(Ordering::Relaxed), 1);
//! ```

mod absence;
mod capability;
mod constants;
mod error;
mod liveness;
mod non_nullable;
mod on_expire;
mod shared_ownership;
mod single_fire_silent;
mod single_fire_strict;

#[cfg(test)]
mod test_utils;

pub use absence::*;
pub use capability::*;
pub(crate) use constants::*;
pub use error::*;
pub use liveness::*;
pub use non_nullable::*;
pub use on_expire::*;
pub use shared_ownership::*;
pub use single_fire_silent::*;
pub use single_fire_strict::*;
