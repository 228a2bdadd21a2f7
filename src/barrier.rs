//! Plain shared loads and stores.
//!
//! These are not read-modify-write operations. They only keep the compiler from
//! caching, tearing, or reordering the access across the barrier; hardware
//! ordering is left to the atomic operations that follow.

use crate::sync::atomic::{compiler_fence, Ordering};
use crate::word::AtomicCell;

/// Loads `cell` after a compiler barrier.
#[inline(always)]
pub fn load_shared<A: AtomicCell>(cell: &A) -> A::Value {
    compiler_fence(Ordering::SeqCst);
    cell.load(Ordering::Relaxed)
}

/// Stores `value` into `cell`, followed by a compiler barrier.
#[inline(always)]
pub fn store_shared<A: AtomicCell>(cell: &A, value: A::Value) {
    cell.store(value, Ordering::Relaxed);
    compiler_fence(Ordering::SeqCst);
}
