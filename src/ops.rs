//! Typed atomic operations on caller-owned cells.
//!
//! Each function takes any cell whose operand is 4 or 8 bytes wide
//! (`AtomicU32`, `AtomicI64`, `AtomicUsize`, ...) and dispatches through
//! [`DefaultEmitter`]. Arithmetic wraps.
//!
//! ```
//! use core::sync::atomic::AtomicU32;
//!
//! let cell = AtomicU32::new(10);
//! assert_eq!(condswap::add_return(&cell, 5), 15);
//! assert_eq!(condswap::exchange(&cell, 100), 15);
//! assert_eq!(condswap::compare_exchange(&cell, 7, 8), 100);
//! condswap::dec(&cell);
//! assert_eq!(condswap::read(&cell), 99);
//! ```

use num_traits::{One, WrappingNeg};

use crate::barrier::{load_shared, store_shared};
use crate::emit::{DefaultEmitter, Emitter};
use crate::word::AtomicCell;

/// Plain store. Not a read-modify-write.
#[inline(always)]
pub fn set<A: AtomicCell>(cell: &A, value: A::Value) {
    store_shared(cell, value);
}

/// Plain load. Not a read-modify-write.
#[inline(always)]
pub fn read<A: AtomicCell>(cell: &A) -> A::Value {
    load_shared(cell)
}

/// Replaces the cell's value with `value` and returns the value it replaced.
#[inline(always)]
pub fn exchange<A: AtomicCell>(cell: &A, value: A::Value) -> A::Value {
    DefaultEmitter::exchange(cell, value)
}

/// Stores `desired` if the cell holds `expected`, in a single attempt.
///
/// Returns the value actually found, which equals `expected` exactly when the
/// store happened. A mismatch is not retried.
#[inline(always)]
pub fn compare_exchange<A: AtomicCell>(cell: &A, expected: A::Value, desired: A::Value) -> A::Value {
    DefaultEmitter::compare_exchange(cell, expected, desired)
}

/// [`compare_exchange`] in the shape of `core`'s: `Ok(previous)` if the store
/// happened, `Err(actual)` if not.
#[inline(always)]
pub fn compare_exchange_result<A: AtomicCell>(
    cell: &A,
    expected: A::Value,
    desired: A::Value,
) -> Result<A::Value, A::Value> {
    let actual = compare_exchange(cell, expected, desired);
    if actual == expected {
        Ok(actual)
    } else {
        Err(actual)
    }
}

/// Adds `delta` and returns the new value.
#[inline(always)]
pub fn add_return<A: AtomicCell>(cell: &A, delta: A::Value) -> A::Value {
    DefaultEmitter::add_return(cell, delta)
}

/// Subtracts `delta` and returns the new value.
#[inline(always)]
pub fn sub_return<A: AtomicCell>(cell: &A, delta: A::Value) -> A::Value {
    add_return(cell, delta.wrapping_neg())
}

/// Adds `delta`.
#[inline(always)]
pub fn add<A: AtomicCell>(cell: &A, delta: A::Value) {
    let _ = add_return(cell, delta);
}

/// Subtracts `delta`.
#[inline(always)]
pub fn sub<A: AtomicCell>(cell: &A, delta: A::Value) {
    let _ = sub_return(cell, delta);
}

/// Adds one.
#[inline(always)]
pub fn inc<A: AtomicCell>(cell: &A) {
    add(cell, <A::Value as One>::one());
}

/// Subtracts one.
#[inline(always)]
pub fn dec<A: AtomicCell>(cell: &A) {
    sub(cell, <A::Value as One>::one());
}

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicI32, AtomicU64, AtomicUsize};

    #[test]
    fn derived_operations() {
        let cell = AtomicI32::new(0);
        assert_eq!(sub_return(&cell, 5), -5);
        add(&cell, 7);
        sub(&cell, 1);
        inc(&cell);
        inc(&cell);
        dec(&cell);
        assert_eq!(read(&cell), 2);
    }

    #[test]
    fn unsigned_subtraction_wraps() {
        let cell = AtomicU64::new(1);
        assert_eq!(sub_return(&cell, 2), u64::MAX);
        inc(&cell);
        assert_eq!(read(&cell), 0);
        dec(&cell);
        assert_eq!(read(&cell), u64::MAX);
    }

    #[test]
    fn compare_exchange_result_shape() {
        let cell = AtomicUsize::new(3);
        assert_eq!(compare_exchange_result(&cell, 3, 4), Ok(3));
        assert_eq!(compare_exchange_result(&cell, 3, 5), Err(4));
        set(&cell, 9);
        assert_eq!(compare_exchange(&cell, 9, 1), 9);
        assert_eq!(read(&cell), 1);
    }
}
