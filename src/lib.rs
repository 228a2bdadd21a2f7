//! # `condswap` - Conditional-Swap Atomics
//!
//! Lock-free exchange, compare-exchange and fetch-and-add over 32- and 64-bit
//! memory cells, written for targets whose only atomic read-modify-write
//! instruction is a conditional swap (compare-and-swap). Everything else is
//! composed from it.
//!
//! This is a leaf layer: no allocation, no locks, no state of its own. Cells are
//! owned by the caller.
//!
//! ## Guarantees
//!
//! - **Indivisibility**: every operation on a cell is atomic with respect to every
//!   other operation on the same cell. No partial write is ever observable.
//! - **Ordering**: every mutating operation is sequentially consistent. There is
//!   no weaker variant.
//! - **Progress**: all operations are lock-free. [`exchange`] and [`add_return`]
//!   are *not* wait-free: under sustained interference a single caller can spin
//!   indefinitely while others make progress. This is never reported as an error.
//!
//! ## Architecture
//!
//! 1. **Width dispatch** ([`Width`], [`Word`]): operands are 4 or 8 bytes. Typed
//!    callers are held to that by the sealed [`Word`] trait at compile time;
//!    width-erased callers ([`raw`]) abort on any other length.
//! 2. **Emission** ([`Emitter`]): [`ConditionalSwap`] builds `exchange` as a spin
//!    on the conditional swap and issues `compare_exchange` as a single attempt.
//!    [`NativeRmw`] uses the target's own swap and fetch-add instead.
//! 3. **Retry composition** ([`retry`]): fetch-and-add as read, compute,
//!    compare-exchange, retry on mismatch.
//! 4. **Typed surface** ([`ops`], [`AtomicWord`]): `set`, `read`, `exchange`,
//!    `compare_exchange`, `add_return`, `sub_return`, `add`, `sub`, `inc`, `dec`.
//!
//! ## Features
//!
//! - `native-rmw`: route the public surface through [`NativeRmw`] instead of
//!   [`ConditionalSwap`].
//! - `tracing`: emit `trace` events from heavily contended retry loops, and an
//!   `error` event before aborting on an unsupported width.
//!
//! ## Example
//!
//! ```rust
//! use condswap::AtomicWord;
//!
//! let hits = AtomicWord::new(0u64);
//! std::thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             for _ in 0..1000 {
//!                 hits.inc();
//!             }
//!         });
//!     }
//! });
//! assert_eq!(hits.read(), 4000);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod sync;

pub mod barrier;
pub mod cell;
pub mod emit;
pub mod ops;
#[cfg(not(loom))]
pub mod raw;
pub mod retry;
pub mod width;
pub mod word;

pub use cell::AtomicWord;
pub use emit::{ConditionalSwap, DefaultEmitter, Emitter, NativeRmw};
pub use ops::{
    add, add_return, compare_exchange, compare_exchange_result, dec, exchange, inc, read, set, sub,
    sub_return,
};
pub use width::{UnsupportedWidth, Width};
pub use word::{AtomicCell, Word};

// Compile-time assertions for the operand layout.
#[cfg(not(loom))]
const _: () = {
    use core::mem;

    // The 4-byte path is always present.
    assert!(mem::size_of::<AtomicWord<u32>>() == 4);
    assert!(mem::align_of::<AtomicWord<u32>>() == mem::align_of::<core::sync::atomic::AtomicU32>());

    // `Width` discriminants are the byte counts the dispatcher matches on.
    assert!(Width::Four as usize == 4);
    assert!(Width::Eight as usize == 8);
};

#[cfg(all(not(loom), target_has_atomic = "64"))]
const _: () = {
    use core::mem;

    assert!(mem::size_of::<AtomicWord<u64>>() == 8);
    assert!(mem::align_of::<AtomicWord<u64>>() == mem::align_of::<core::sync::atomic::AtomicU64>());
};
