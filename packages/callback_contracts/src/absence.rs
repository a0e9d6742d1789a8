/// Stands in for "no callable" when checking whether a wrapper is armed.
///
/// Every wrapper in this crate can be compared against `Empty` in either operand order. For
/// wrappers that may be empty, the comparison reflects their current state. For
/// [`NotEmptyFn`][crate::NotEmptyFn] the comparison always reports "not empty", which makes the
/// guarantee visible at the call site.
///
/// # Example
///
/// ```rust
/// use callback_contracts::{CallOnceSilent, Empty};
///
/// let mut once = CallOnceSilent::new(|| ());
/// assert!(once != Empty);
///
/// once.call(());
/// assert!(once == Empty);
/// assert!(Empty == once);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Empty;
