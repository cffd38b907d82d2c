//! Register File Description.
//!
//! This module describes the modeled register file: the 32 integer registers
//! plus the program counter. It provides:
//! 1. **Identity:** A `Register` enum indexed exactly like the instruction fields.
//! 2. **Naming:** Canonical ABI names from one immutable table.
//! 3. **Classification:** The ABI role of each register, consumed by the calling convention.
//! 4. **Layout:** Width and implicit-extension behaviour of partial writes.

use std::fmt;

use serde::Serialize;

use crate::common::constants::{GPR_COUNT, REGISTER_COUNT, XLEN_BYTES};

/// ABI register names for x0–x31 followed by the program counter.
const REG_NAMES: [&str; REGISTER_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6", "pc",
];

/// A modeled register.
///
/// Discriminants equal the register index used in instruction encodings;
/// `Pc` is index 32 and cannot be named by an instruction field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    Zero = 0,
    Ra,
    Sp,
    Gp,
    Tp,
    T0,
    T1,
    T2,
    S0,
    S1,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    S10,
    S11,
    T3,
    T4,
    T5,
    T6,
    Pc,
}

/// All registers in index order.
pub const ALL_REGISTERS: [Register; REGISTER_COUNT] = [
    Register::Zero,
    Register::Ra,
    Register::Sp,
    Register::Gp,
    Register::Tp,
    Register::T0,
    Register::T1,
    Register::T2,
    Register::S0,
    Register::S1,
    Register::A0,
    Register::A1,
    Register::A2,
    Register::A3,
    Register::A4,
    Register::A5,
    Register::A6,
    Register::A7,
    Register::S2,
    Register::S3,
    Register::S4,
    Register::S5,
    Register::S6,
    Register::S7,
    Register::S8,
    Register::S9,
    Register::S10,
    Register::S11,
    Register::T3,
    Register::T4,
    Register::T5,
    Register::T6,
    Register::Pc,
];

/// ABI role of a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterClass {
    /// Hard-wired zero (x0).
    Zero,
    /// Return address (ra).
    Link,
    /// Stack pointer (sp).
    StackPointer,
    /// Global pointer (gp).
    GlobalPointer,
    /// Thread pointer (tp).
    ThreadPointer,
    /// Caller-saved temporary (t0–t6).
    Temporary,
    /// Callee-saved register (s0–s11).
    Saved,
    /// Argument / return-value register (a0–a7).
    Argument,
    /// Program counter.
    ProgramCounter,
}

/// How a write narrower than the register affects the upper bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ImplicitExtend {
    /// The written value is sign-extended to the full register width.
    SignExtendToFullWidth,
}

/// Layout of a register as seen by the host framework.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterInfo {
    /// Full-width register containing this one (always itself here).
    pub full_width: Register,
    /// Byte offset inside the full-width register.
    pub offset: usize,
    /// Width in bytes.
    pub size: usize,
    /// Extension applied by partial-width writes.
    pub extend: ImplicitExtend,
}

impl Register {
    /// Returns the register at `idx`, or `None` if `idx` is out of range.
    pub fn from_index(idx: usize) -> Option<Self> {
        ALL_REGISTERS.get(idx).copied()
    }

    /// Returns the general-purpose register named by a 5-bit instruction field.
    ///
    /// Only the low five bits of `idx` are used, so this can never name `pc`.
    #[inline(always)]
    pub const fn gpr(idx: usize) -> Self {
        ALL_REGISTERS[idx % GPR_COUNT]
    }

    /// Returns the register index (0–32).
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the canonical ABI name.
    pub const fn name(self) -> &'static str {
        REG_NAMES[self as usize]
    }

    /// Returns true for the hard-wired zero register.
    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Zero)
    }

    /// Returns the ABI role of this register.
    pub const fn class(self) -> RegisterClass {
        match self {
            Self::Zero => RegisterClass::Zero,
            Self::Ra => RegisterClass::Link,
            Self::Sp => RegisterClass::StackPointer,
            Self::Gp => RegisterClass::GlobalPointer,
            Self::Tp => RegisterClass::ThreadPointer,
            Self::T0 | Self::T1 | Self::T2 | Self::T3 | Self::T4 | Self::T5 | Self::T6 => {
                RegisterClass::Temporary
            }
            Self::S0
            | Self::S1
            | Self::S2
            | Self::S3
            | Self::S4
            | Self::S5
            | Self::S6
            | Self::S7
            | Self::S8
            | Self::S9
            | Self::S10
            | Self::S11 => RegisterClass::Saved,
            Self::A0 | Self::A1 | Self::A2 | Self::A3 | Self::A4 | Self::A5 | Self::A6 | Self::A7 => {
                RegisterClass::Argument
            }
            Self::Pc => RegisterClass::ProgramCounter,
        }
    }

    /// Returns the host-facing layout of this register.
    pub const fn info(self) -> RegisterInfo {
        RegisterInfo {
            full_width: self,
            offset: 0,
            size: XLEN_BYTES,
            extend: ImplicitExtend::SignExtendToFullWidth,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the display name for a raw register number.
///
/// Numbers outside the modeled file render as `x<N>`.
pub fn register_name(idx: usize) -> String {
    Register::from_index(idx).map_or_else(|| format!("x{idx}"), |r| r.name().to_string())
}
