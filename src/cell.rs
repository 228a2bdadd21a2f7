//! An owned atomic word.

use core::fmt;

use crate::ops;
use crate::word::{AtomicCell, Word};

/// A 4- or 8-byte atomic integer with the crate's operations as methods.
///
/// Layout-identical to the `core` atomic it wraps. Use the free functions in
/// [`ops`](crate::ops) when the cell is owned by someone else.
#[repr(transparent)]
pub struct AtomicWord<T: Word> {
    inner: T::Cell,
}

impl<T: Word> AtomicWord<T> {
    /// Creates a new cell.
    #[inline(always)]
    pub fn new(value: T) -> Self {
        Self {
            inner: <T::Cell as AtomicCell>::new(value),
        }
    }

    /// The underlying `core` atomic.
    #[inline(always)]
    pub fn as_cell(&self) -> &T::Cell {
        &self.inner
    }

    /// Consumes the cell, returning its value.
    #[inline(always)]
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }

    /// Plain store.
    #[inline(always)]
    pub fn set(&self, value: T) {
        ops::set(&self.inner, value);
    }

    /// Plain load.
    #[inline(always)]
    pub fn read(&self) -> T {
        ops::read(&self.inner)
    }

    /// Replaces the value, returning the previous one.
    #[inline(always)]
    pub fn exchange(&self, value: T) -> T {
        ops::exchange(&self.inner, value)
    }

    /// Single-attempt compare-exchange; returns the value actually found.
    #[inline(always)]
    pub fn compare_exchange(&self, expected: T, desired: T) -> T {
        ops::compare_exchange(&self.inner, expected, desired)
    }

    /// Single-attempt compare-exchange; `Ok(previous)` on success, `Err(actual)` otherwise.
    #[inline(always)]
    pub fn compare_exchange_result(&self, expected: T, desired: T) -> Result<T, T> {
        ops::compare_exchange_result(&self.inner, expected, desired)
    }

    /// Adds `delta`, returning the new value.
    #[inline(always)]
    pub fn add_return(&self, delta: T) -> T {
        ops::add_return(&self.inner, delta)
    }

    /// Subtracts `delta`, returning the new value.
    #[inline(always)]
    pub fn sub_return(&self, delta: T) -> T {
        ops::sub_return(&self.inner, delta)
    }

    /// Adds `delta`.
    #[inline(always)]
    pub fn add(&self, delta: T) {
        ops::add(&self.inner, delta);
    }

    /// Subtracts `delta`.
    #[inline(always)]
    pub fn sub(&self, delta: T) {
        ops::sub(&self.inner, delta);
    }

    /// Adds one.
    #[inline(always)]
    pub fn inc(&self) {
        ops::inc(&self.inner);
    }

    /// Subtracts one.
    #[inline(always)]
    pub fn dec(&self) {
        ops::dec(&self.inner);
    }
}

impl<T: Word> Default for AtomicWord<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Word> From<T> for AtomicWord<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Word> fmt::Debug for AtomicWord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicWord").field(&self.read()).finish()
    }
}
