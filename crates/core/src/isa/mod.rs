//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the RV64I encoding constants, the decoder and the text renderer.
//!
//! # Contents
//!
//! * `rv64i`: Opcodes and function codes for the base integer set and its word operations.
//! * `instruction`: Field extraction and the decoded `Instruction` record.
//! * `decode`: Word (and byte buffer) to `Instruction`, including pseudo-instructions.
//! * `disasm`: Token and text rendering.
//! * `abi`: Register roles under the LP64 calling convention.

/// Application Binary Interface (ABI) register constants and calling convention.
pub mod abi;

/// Instruction decoding logic for all RV64I instruction formats.
pub mod decode;

/// Instruction renderer producing typed tokens and plain text.
pub mod disasm;

/// Instruction encoding structures and bit extraction utilities.
pub mod instruction;

/// Base integer instruction set (64-bit RISC-V core instructions).
pub mod rv64i;

pub use decode::{decode, decode_bytes, try_decode};
pub use instruction::{Format, Instruction, Mnemonic};
