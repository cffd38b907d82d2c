//! Virtual address type.
//!
//! Branch and jump targets are computed by adding a signed, sign-extended
//! immediate to an instruction address. All such arithmetic wraps modulo 2^64,
//! matching the behaviour of the hardware program counter.

use std::fmt;

/// A virtual address in the RISC-V address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub u64);

impl VirtAddr {
    /// Creates a new virtual address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns this address displaced by a signed offset, wrapping on overflow.
    ///
    /// # Arguments
    ///
    /// * `offset` - Signed byte displacement (e.g. a decoded branch immediate).
    #[inline(always)]
    pub const fn offset(self, offset: i64) -> Self {
        Self(self.0.wrapping_add_signed(offset))
    }

    /// Returns the address `len` bytes past this one, wrapping on overflow.
    #[inline(always)]
    pub const fn advance(self, len: u64) -> Self {
        Self(self.0.wrapping_add(len))
    }

    /// Returns true if the address is aligned to `align` bytes.
    ///
    /// `align` must be a power of two.
    pub const fn is_aligned(self, align: u64) -> bool {
        self.0 & (align - 1) == 0
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl From<VirtAddr> for u64 {
    fn from(addr: VirtAddr) -> Self {
        addr.0
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
