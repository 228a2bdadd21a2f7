//! Raw exchange and compare-exchange emission.
//!
//! An [`Emitter`] is an instruction-selection strategy. [`ConditionalSwap`] is
//! written against a target whose only read-modify-write instruction is a
//! conditional swap; [`NativeRmw`] uses the target's own swap and fetch-add.
//! Which one the public surface uses is fixed at build time by the
//! `native-rmw` feature (see [`DefaultEmitter`]).
//!
//! Every mutating operation here is `SeqCst`. There is no weaker variant.

use crate::barrier::load_shared;
use crate::retry;
use crate::sync::atomic::Ordering;
use crate::word::AtomicCell;

use num_traits::WrappingAdd;

/// An instruction-selection strategy for the three core operations.
pub trait Emitter: Sized {
    /// Unconditionally replaces the cell's value, returning the previous one.
    fn exchange<A: AtomicCell>(cell: &A, value: A::Value) -> A::Value;

    /// Makes exactly one conditional-swap attempt.
    ///
    /// Returns the value present immediately before the attempt. The swap took
    /// effect if and only if that value equals `expected`.
    fn compare_exchange<A: AtomicCell>(cell: &A, expected: A::Value, desired: A::Value) -> A::Value;

    /// Adds `delta` (wrapping) and returns the new value.
    ///
    /// Synthesized from [`compare_exchange`](Self::compare_exchange) unless the
    /// strategy has something better.
    #[inline]
    fn add_return<A: AtomicCell>(cell: &A, delta: A::Value) -> A::Value {
        retry::add_return::<Self, A>(cell, delta)
    }
}

/// Emission for targets with a conditional swap and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConditionalSwap;

impl Emitter for ConditionalSwap {
    /// Spins on the conditional swap until it completes.
    ///
    /// Each failed attempt hands back the value it found, which becomes the
    /// expected value of the next attempt. The loop ends as soon as one attempt
    /// lands, whatever the cell held; it never reports a mismatch. It is
    /// lock-free but not wait-free.
    #[inline]
    fn exchange<A: AtomicCell>(cell: &A, value: A::Value) -> A::Value {
        let mut current = load_shared(cell);
        loop {
            match cell.compare_exchange_weak(current, value, Ordering::SeqCst, Ordering::Relaxed) {
                Ok(old) => return old,
                Err(seen) => current = seen,
            }
        }
    }

    #[inline]
    fn compare_exchange<A: AtomicCell>(cell: &A, expected: A::Value, desired: A::Value) -> A::Value {
        match cell.compare_exchange(expected, desired, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(old) | Err(old) => old,
        }
    }
}

/// Emission through the target's native swap and fetch-add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeRmw;

impl Emitter for NativeRmw {
    #[inline]
    fn exchange<A: AtomicCell>(cell: &A, value: A::Value) -> A::Value {
        cell.swap(value, Ordering::SeqCst)
    }

    #[inline]
    fn compare_exchange<A: AtomicCell>(cell: &A, expected: A::Value, desired: A::Value) -> A::Value {
        ConditionalSwap::compare_exchange(cell, expected, desired)
    }

    #[inline]
    fn add_return<A: AtomicCell>(cell: &A, delta: A::Value) -> A::Value {
        cell.fetch_add(delta, Ordering::SeqCst).wrapping_add(&delta)
    }
}

/// The strategy behind the crate's public operations.
#[cfg(not(feature = "native-rmw"))]
pub type DefaultEmitter = ConditionalSwap;

/// The strategy behind the crate's public operations.
#[cfg(feature = "native-rmw")]
pub type DefaultEmitter = NativeRmw;

#[cfg(all(test, not(loom)))]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicI32, AtomicU32, AtomicU64};
    use std::thread;

    fn exercise<E: Emitter>() {
        let cell = AtomicU32::new(10);
        assert_eq!(E::exchange(&cell, 20), 10);
        assert_eq!(cell.load(Ordering::SeqCst), 20);

        assert_eq!(E::compare_exchange(&cell, 20, 30), 20);
        assert_eq!(cell.load(Ordering::SeqCst), 30);
        assert_eq!(E::compare_exchange(&cell, 20, 40), 30);
        assert_eq!(cell.load(Ordering::SeqCst), 30);

        assert_eq!(E::add_return(&cell, 5), 35);
        assert_eq!(E::add_return(&cell, u32::MAX), 34);

        let wide = AtomicU64::new(u64::MAX);
        assert_eq!(E::add_return(&wide, 2), 1);
        assert_eq!(E::exchange(&wide, 1 << 40), 1);
        assert_eq!(E::compare_exchange(&wide, 1 << 40, 0), 1 << 40);

        let signed = AtomicI32::new(-3);
        assert_eq!(E::add_return(&signed, 3), 0);
        assert_eq!(E::add_return(&signed, i32::MIN), i32::MIN);
    }

    #[test]
    fn conditional_swap_basic_contract() {
        exercise::<ConditionalSwap>();
    }

    #[test]
    fn native_rmw_basic_contract() {
        exercise::<NativeRmw>();
    }

    #[test]
    fn exchange_always_installs_under_contention() {
        let cell = AtomicU64::new(0);
        let threads = 8u64;
        let per_thread = 2_000u64;

        // Every thread swaps in values tagged with its own id. The chain of
        // returned values must account for every store exactly once.
        let returned: Vec<Vec<u64>> = thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let cell = &cell;
                    s.spawn(move || {
                        (1..=per_thread)
                            .map(|i| ConditionalSwap::exchange(cell, (t << 32) | i))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut seen: Vec<u64> = returned.into_iter().flatten().collect();
        seen.push(cell.load(Ordering::SeqCst));
        seen.sort_unstable();

        let mut expected: Vec<u64> = (0..threads)
            .flat_map(|t| (1..=per_thread).map(move |i| (t << 32) | i))
            .collect();
        expected.push(0);
        expected.sort_unstable();

        assert_eq!(seen, expected);
    }

    #[test]
    fn compare_exchange_makes_one_attempt() {
        let cell = AtomicU32::new(1);
        // A mismatch must not be retried into a success.
        for _ in 0..4 {
            assert_eq!(ConditionalSwap::compare_exchange(&cell, 0, 9), 1);
        }
        assert_eq!(cell.load(Ordering::SeqCst), 1);
    }
}
