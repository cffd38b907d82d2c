//! RISC-V Base Integer Instruction Set (RV64I).
//!
//! Encoding constants for the base integer ISA and its RV64 word-sized
//! additions.
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes (Load, Store, Branch, Jal, OpImm, OpReg, System, etc.).
//! - `funct3`: Minor opcodes distinguishing instructions within a major opcode.
//! - `funct7`: Upper function bits for R-type operations and immediate shifts.

/// Function code 3 definitions for base integer operations.
pub mod funct3;

/// Function code 7 (and shift funct6) definitions.
pub mod funct7;

/// Base integer instruction set opcodes.
pub mod opcodes;
