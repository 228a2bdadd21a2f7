//! Width-erased operations.
//!
//! For callers that only know a cell's address and byte length at the call site.
//! Values travel as `u64` bit patterns; on the 4-byte path the upper half of the
//! argument is ignored and the result is zero-extended.
//!
//! A length other than 4 or 8 aborts the process. See [`Width::expect_bytes`].
//!
//! # Safety
//!
//! Every function here requires that `addr`:
//! - is non-null and aligned to `len`,
//! - points to `len` bytes that stay valid for the duration of the call,
//! - is only accessed atomically by any other thread while the call runs.

use core::sync::atomic::AtomicU32;
#[cfg(target_has_atomic = "64")]
use core::sync::atomic::AtomicU64;

use crate::ops;
use crate::width::Width;
use crate::word::Word;

macro_rules! dispatch {
    ($addr:expr, $len:expr, |$cell:ident: $word:ident| $body:expr) => {
        match Width::expect_bytes($len) {
            Width::Four => {
                type $word = u32;
                // SAFETY: upheld by the caller, see module docs.
                let $cell = unsafe { AtomicU32::from_ptr($addr.cast::<u32>()) };
                u64::from($body)
            }
            #[cfg(target_has_atomic = "64")]
            Width::Eight => {
                type $word = u64;
                // SAFETY: upheld by the caller, see module docs.
                let $cell = unsafe { AtomicU64::from_ptr($addr.cast::<u64>()) };
                $body
            }
            #[cfg(not(target_has_atomic = "64"))]
            Width::Eight => crate::width::trap(8),
        }
    };
}

/// Width-erased [`ops::exchange`].
///
/// # Safety
/// See the [module documentation](self).
#[inline]
pub unsafe fn exchange(addr: *mut u8, value: u64, len: usize) -> u64 {
    dispatch!(addr, len, |cell: W| ops::exchange(cell, W::from_bits(value)))
}

/// Width-erased [`ops::compare_exchange`].
///
/// # Safety
/// See the [module documentation](self).
#[inline]
pub unsafe fn compare_exchange(addr: *mut u8, expected: u64, desired: u64, len: usize) -> u64 {
    dispatch!(addr, len, |cell: W| ops::compare_exchange(
        cell,
        W::from_bits(expected),
        W::from_bits(desired)
    ))
}

/// Width-erased [`ops::add_return`].
///
/// # Safety
/// See the [module documentation](self).
#[inline]
pub unsafe fn add_return(addr: *mut u8, delta: u64, len: usize) -> u64 {
    dispatch!(addr, len, |cell: W| ops::add_return(cell, W::from_bits(delta)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_byte_path_truncates_and_zero_extends() {
        let slot = AtomicU32::new(10);
        let addr = slot.as_ptr().cast::<u8>();
        unsafe {
            assert_eq!(add_return(addr, 5, 4), 15);
            assert_eq!(exchange(addr, 0xFFFF_FFFF_0000_0064, 4), 15);
            assert_eq!(compare_exchange(addr, 100, 0xFFFF_FFFF, 4), 100);
            // -1 as a 32-bit delta.
            assert_eq!(add_return(addr, u64::from(u32::MAX), 4), 0xFFFF_FFFE);
        }
        assert_eq!(slot.into_inner(), 0xFFFF_FFFE);
    }

    #[cfg(target_has_atomic = "64")]
    #[test]
    fn eight_byte_path_uses_the_full_word() {
        let slot = AtomicU64::new(1 << 40);
        let addr = slot.as_ptr().cast::<u8>();
        unsafe {
            assert_eq!(add_return(addr, 1, 8), (1 << 40) + 1);
            assert_eq!(compare_exchange(addr, 1, 2, 8), (1 << 40) + 1);
            assert_eq!(exchange(addr, u64::MAX, 8), (1 << 40) + 1);
            assert_eq!(add_return(addr, 1, 8), 0);
        }
        assert_eq!(slot.into_inner(), 0);
    }
}
