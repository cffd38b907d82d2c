//! RISC-V Application Binary Interface (ABI).
//!
//! Register index constants and the LP64 integer calling convention as seen by
//! an analysis host: which registers survive a call, where arguments and
//! return values live, and which register holds the global pointer.

use serde::Serialize;

use crate::common::Register;

/// Register x0 (zero register, always zero).
pub const REG_ZERO: usize = 0;
/// Register x1 (return address, ra).
pub const REG_RA: usize = 1;
/// Register x2 (stack pointer, sp).
pub const REG_SP: usize = 2;
/// Register x3 (global pointer, gp).
pub const REG_GP: usize = 3;
/// Register x10 (first argument/return value, a0).
pub const REG_A0: usize = 10;
/// Register x11 (second argument/high return value, a1).
pub const REG_A1: usize = 11;

/// An integer calling convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CallingConvention {
    /// Convention name.
    pub name: &'static str,
    /// Registers a callee may clobber.
    pub caller_saved: &'static [Register],
    /// Registers a callee must preserve.
    pub callee_saved: &'static [Register],
    /// Integer argument registers in order.
    pub int_args: &'static [Register],
    /// Integer return value register.
    pub int_return: Register,
    /// Upper half of a two-register return value.
    pub high_int_return: Register,
    /// Global pointer register.
    pub global_pointer: Register,
    /// Whether variadic arguments are passed in argument registers.
    pub varargs_in_registers: bool,
    /// Whether the caller reserves stack space for register arguments.
    pub stack_reserved_for_args: bool,
}

/// The standard LP64 integer calling convention.
pub const LP64: CallingConvention = CallingConvention {
    name: "default",
    caller_saved: &[
        Register::Ra,
        Register::T0,
        Register::T1,
        Register::T2,
        Register::A0,
        Register::A1,
        Register::A2,
        Register::A3,
        Register::A4,
        Register::A5,
        Register::A6,
        Register::A7,
        Register::T3,
        Register::T4,
        Register::T5,
        Register::T6,
    ],
    callee_saved: &[
        Register::Sp,
        Register::S0,
        Register::S1,
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
    ],
    int_args: &[
        Register::A0,
        Register::A1,
        Register::A2,
        Register::A3,
        Register::A4,
        Register::A5,
        Register::A6,
        Register::A7,
    ],
    int_return: Register::A0,
    high_int_return: Register::A1,
    global_pointer: Register::Gp,
    varargs_in_registers: true,
    stack_reserved_for_args: false,
};

impl CallingConvention {
    /// Returns true if `reg` is preserved across a call.
    pub fn preserves(&self, reg: Register) -> bool {
        self.callee_saved.contains(&reg)
    }
}
