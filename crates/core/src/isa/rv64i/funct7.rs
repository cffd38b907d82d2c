//! RV64I Function Codes (funct7 / funct6).
//!
//! The `funct7` field (bits 31-25) separates operations sharing a `funct3`
//! in R-type encodings. The 64-bit immediate shifts use bit 25 as the top
//! bit of a 6-bit shift amount, so they are checked against `funct6`
//! (bits 31-26) instead.

/// Default operation (ADD, SRL, ...).
pub const DEFAULT: u32 = 0b0000000;

/// Alternate operation (SUB, SRA, SUBW, SRAW, SRAIW).
pub const ALT: u32 = 0b0100000;

/// Default 64-bit immediate shift (SLLI, SRLI).
pub const SHIFT6_DEFAULT: u32 = 0b000000;

/// Arithmetic 64-bit immediate shift (SRAI).
pub const SHIFT6_ARITH: u32 = 0b010000;
