//! Operand width dispatch.
//!
//! The conditional-swap instruction family comes in exactly two sizes, so every
//! operation in this crate is selected by a [`Width`]. Typed callers get their
//! width from [`Word::WIDTH`](crate::Word::WIDTH) and can never name anything
//! else. Width-erased callers go through [`Width::expect_bytes`], which aborts
//! on anything outside `{4, 8}`.

use core::fmt;

/// The byte width of a memory cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Width {
    /// 32-bit cell (`cs`-class instruction).
    Four = 4,
    /// 64-bit cell (`csg`-class instruction).
    Eight = 8,
}

impl Width {
    /// Classifies a byte count.
    ///
    /// The 8-byte width is only accepted on targets with native 64-bit atomics.
    #[inline]
    pub const fn from_bytes(bytes: usize) -> Result<Self, UnsupportedWidth> {
        match bytes {
            4 => Ok(Width::Four),
            #[cfg(target_has_atomic = "64")]
            8 => Ok(Width::Eight),
            _ => Err(UnsupportedWidth { bytes }),
        }
    }

    /// Classifies `T` by its size.
    #[inline]
    pub const fn of<T>() -> Result<Self, UnsupportedWidth> {
        Self::from_bytes(core::mem::size_of::<T>())
    }

    /// Classifies a byte count, aborting the process if it is not a supported width.
    ///
    /// A mis-sized conditional swap would silently corrupt the neighbouring
    /// bytes, so there is no recovery path here: the process is torn down at the
    /// point of use.
    #[inline(always)]
    pub fn expect_bytes(bytes: usize) -> Self {
        match Self::from_bytes(bytes) {
            Ok(width) => width,
            Err(err) => trap(err.bytes()),
        }
    }

    /// Width in bytes.
    #[inline(always)]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Width in bits.
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        (self as u32) * 8
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-byte", self.bytes())
    }
}

/// A byte width with no matching conditional-swap instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedWidth {
    bytes: usize,
}

impl UnsupportedWidth {
    /// The rejected byte count.
    pub const fn bytes(&self) -> usize {
        self.bytes
    }
}

impl fmt::Display for UnsupportedWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported atomic operand width: {} bytes", self.bytes)
    }
}

impl std::error::Error for UnsupportedWidth {}

/// Tears the process down for a width with no conditional-swap instruction.
///
/// Every unsupported-width path in the crate ends here; none of them unwind.
#[cold]
#[inline(never)]
pub(crate) fn trap(bytes: usize) -> ! {
    #[cfg(feature = "tracing")]
    tracing::error!(bytes, "{}; aborting", UnsupportedWidth { bytes });
    #[cfg(not(feature = "tracing"))]
    let _ = bytes;
    std::process::abort()
}
