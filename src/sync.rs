//! Atomic type shim.
//!
//! Under `--cfg loom` every cell type comes from `loom` so the emitters and the
//! retry composer can be model-checked without code changes.

#[cfg(loom)]
pub(crate) mod atomic {
    pub use loom::sync::atomic::{AtomicI32, AtomicI64, AtomicIsize, AtomicU32, AtomicU64, AtomicUsize};
    pub use core::sync::atomic::{compiler_fence, Ordering};
}

#[cfg(not(loom))]
pub(crate) mod atomic {
    pub use core::sync::atomic::{compiler_fence, AtomicI32, AtomicU32, AtomicIsize, AtomicUsize, Ordering};
    #[cfg(target_has_atomic = "64")]
    pub use core::sync::atomic::{AtomicI64, AtomicU64};
}
