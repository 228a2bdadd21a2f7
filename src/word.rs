//! The closed set of operand types.
//!
//! [`Word`] names the integers the conditional-swap instructions can operate on,
//! and [`AtomicCell`] names the memory cells that hold them. Both traits are
//! sealed: a 1-, 2- or 16-byte operand is a compile error at the call site
//! rather than a trap at run time.
//!
//! ```compile_fail
//! use core::sync::atomic::AtomicU16;
//!
//! // There is no 2-byte conditional swap.
//! condswap::exchange(&AtomicU16::new(0), 1);
//! ```

use core::fmt::Debug;

use num_traits::{PrimInt, WrappingAdd, WrappingNeg};

use crate::sync::atomic::{AtomicI32, AtomicU32, Ordering};
#[cfg(target_has_atomic = "64")]
use crate::sync::atomic::{AtomicI64, AtomicU64};
#[cfg(any(
    target_pointer_width = "32",
    all(target_pointer_width = "64", target_has_atomic = "64")
))]
use crate::sync::atomic::{AtomicIsize, AtomicUsize};
use crate::width::Width;

mod sealed {
    pub trait Sealed {}
}

/// An integer operand of a supported width.
pub trait Word:
    sealed::Sealed + PrimInt + WrappingAdd + WrappingNeg + Debug + Default + Send + Sync + 'static
{
    /// Width of the operand, and of any cell holding it.
    const WIDTH: Width;

    /// The cell type holding this word.
    type Cell: AtomicCell<Value = Self>;

    /// Zero-extends the bit pattern into a `u64`.
    fn to_bits(self) -> u64;

    /// Truncates a `u64` bit pattern to this width.
    fn from_bits(bits: u64) -> Self;
}

/// A shared memory cell holding a [`Word`].
///
/// This is the instruction set the emitters are written against. Every method is
/// a single hardware operation.
pub trait AtomicCell: sealed::Sealed + Send + Sync {
    /// The operand type.
    type Value: Word;

    /// Creates a cell holding `value`.
    fn new(value: Self::Value) -> Self;

    /// Loads the current value.
    fn load(&self, order: Ordering) -> Self::Value;

    /// Stores `value`.
    fn store(&self, value: Self::Value, order: Ordering);

    /// Native unconditional swap.
    fn swap(&self, value: Self::Value, order: Ordering) -> Self::Value;

    /// One conditional-swap attempt that fails only on a value mismatch.
    fn compare_exchange(
        &self,
        current: Self::Value,
        new: Self::Value,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self::Value, Self::Value>;

    /// One conditional-swap attempt that may also fail spuriously.
    fn compare_exchange_weak(
        &self,
        current: Self::Value,
        new: Self::Value,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self::Value, Self::Value>;

    /// Native fetch-and-add (wrapping), returning the previous value.
    fn fetch_add(&self, delta: Self::Value, order: Ordering) -> Self::Value;

    /// Consumes the cell, returning the held value.
    fn into_inner(self) -> Self::Value;
}

macro_rules! impl_word {
    ($word:ty, $cell:ty, $width:expr) => {
        impl sealed::Sealed for $word {}
        impl sealed::Sealed for $cell {}

        impl Word for $word {
            const WIDTH: Width = $width;
            type Cell = $cell;

            #[inline(always)]
            #[allow(
                clippy::cast_sign_loss,
                clippy::cast_possible_wrap,
                clippy::cast_possible_truncation
            )]
            fn to_bits(self) -> u64 {
                match Self::WIDTH {
                    Width::Four => u64::from(self as u32),
                    Width::Eight => self as u64,
                }
            }

            #[inline(always)]
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            fn from_bits(bits: u64) -> Self {
                bits as Self
            }
        }

        impl AtomicCell for $cell {
            type Value = $word;

            #[inline(always)]
            fn new(value: $word) -> Self {
                <$cell>::new(value)
            }

            #[inline(always)]
            fn load(&self, order: Ordering) -> $word {
                <$cell>::load(self, order)
            }

            #[inline(always)]
            fn store(&self, value: $word, order: Ordering) {
                <$cell>::store(self, value, order);
            }

            #[inline(always)]
            fn swap(&self, value: $word, order: Ordering) -> $word {
                <$cell>::swap(self, value, order)
            }

            #[inline(always)]
            fn compare_exchange(
                &self,
                current: $word,
                new: $word,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$word, $word> {
                <$cell>::compare_exchange(self, current, new, success, failure)
            }

            #[inline(always)]
            fn compare_exchange_weak(
                &self,
                current: $word,
                new: $word,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$word, $word> {
                <$cell>::compare_exchange_weak(self, current, new, success, failure)
            }

            #[inline(always)]
            fn fetch_add(&self, delta: $word, order: Ordering) -> $word {
                <$cell>::fetch_add(self, delta, order)
            }

            #[inline(always)]
            fn into_inner(self) -> $word {
                #[cfg(loom)]
                // SAFETY: `self` is owned, so no other thread can reach the cell.
                return unsafe { self.unsync_load() };
                #[cfg(not(loom))]
                return <$cell>::into_inner(self);
            }
        }
    };
}

impl_word!(i32, AtomicI32, Width::Four);
impl_word!(u32, AtomicU32, Width::Four);
#[cfg(target_has_atomic = "64")]
impl_word!(i64, AtomicI64, Width::Eight);
#[cfg(target_has_atomic = "64")]
impl_word!(u64, AtomicU64, Width::Eight);
#[cfg(target_pointer_width = "32")]
impl_word!(isize, AtomicIsize, Width::Four);
#[cfg(target_pointer_width = "32")]
impl_word!(usize, AtomicUsize, Width::Four);
#[cfg(all(target_pointer_width = "64", target_has_atomic = "64"))]
impl_word!(isize, AtomicIsize, Width::Eight);
#[cfg(all(target_pointer_width = "64", target_has_atomic = "64"))]
impl_word!(usize, AtomicUsize, Width::Eight);

// Every word must match the width it claims.
const _: () = {
    use core::mem::size_of;

    const fn check<T: Word>() {
        assert!(size_of::<T>() == T::WIDTH.bytes());
    }

    check::<i32>();
    check::<u32>();
    #[cfg(target_has_atomic = "64")]
    {
        check::<i64>();
        check::<u64>();
    }
    #[cfg(any(
        target_pointer_width = "32",
        all(target_pointer_width = "64", target_has_atomic = "64")
    ))]
    {
        check::<isize>();
        check::<usize>();
    }
};

// Hardware cells carry no padding. Loom's model cells do, so this only holds
// outside the model checker.
#[cfg(not(loom))]
const _: () = {
    use core::mem::size_of;

    const fn check<T: Word>() {
        assert!(size_of::<T::Cell>() == size_of::<T>());
    }

    check::<i32>();
    check::<u32>();
    #[cfg(target_has_atomic = "64")]
    {
        check::<i64>();
        check::<u64>();
    }
    #[cfg(any(
        target_pointer_width = "32",
        all(target_pointer_width = "64", target_has_atomic = "64")
    ))]
    {
        check::<isize>();
        check::<usize>();
    }
};
