//! Read-modify-write loops composed from compare-exchange.
//!
//! A target with only a conditional swap has no fetch-and-add, so one is built
//! here: read the cell, compute the new value, try to swap it in, and start over
//! from whatever the failed attempt saw. Some participant always wins a contended
//! round, but an individual caller can lose indefinitely. That is never reported.

use crossbeam_utils::Backoff;
use num_traits::WrappingAdd;

use crate::barrier::load_shared;
use crate::emit::Emitter;
use crate::word::AtomicCell;

/// Applies `f` to the cell until one attempt lands, returning `(old, new)`.
///
/// `f` may be called more than once and must be a pure function of its input.
/// Between failed attempts the thread spins; it never yields or parks.
#[inline]
pub fn update<E, A, F>(cell: &A, mut f: F) -> (A::Value, A::Value)
where
    E: Emitter,
    A: AtomicCell,
    F: FnMut(A::Value) -> A::Value,
{
    let backoff = Backoff::new();
    let mut retries: u32 = 0;
    let mut old = load_shared(cell);
    loop {
        let new = f(old);
        let seen = E::compare_exchange(cell, old, new);
        if seen == old {
            return (old, new);
        }
        old = seen;
        retries = retries.saturating_add(1);
        note_contention::<A>(retries);
        backoff.spin();
    }
}

/// Adds `delta` (wrapping) through `E`'s compare-exchange and returns the new value.
#[inline]
pub fn add_return<E, A>(cell: &A, delta: A::Value) -> A::Value
where
    E: Emitter,
    A: AtomicCell,
{
    update::<E, A, _>(cell, |old| old.wrapping_add(&delta)).1
}

#[cfg(feature = "tracing")]
#[cold]
fn note_contention<A: AtomicCell>(retries: u32) {
    use crate::word::Word;

    if retries >= 64 && retries.is_power_of_two() {
        let width = <A::Value as Word>::WIDTH;
        tracing::trace!(
            retries,
            width = %width,
            "compare-exchange retry loop still contended"
        );
    }
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
fn note_contention<A: AtomicCell>(_retries: u32) {}
