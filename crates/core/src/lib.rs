//! RISC-V RV64I decoder and lifter.
//!
//! This crate turns RV64I machine code into structured instructions and analysis IL:
//! 1. **ISA:** Decoding of 32-bit words (RV64I, word operations, pseudo-instructions) and
//!    token rendering.
//! 2. **Lift:** Register-transfer IL, per-instruction control-flow edges and a reference
//!    evaluator.
//! 3. **Arch:** The host-facing `Architecture` trait and its RV64 implementation.
//! 4. **Front End:** Image loading, linear sweep and configuration for the CLI.
//!
//! Every decode and lift call is a pure function of `(bytes, address)`.

/// Host-facing architecture trait and the RV64 processor module.
pub mod arch;
/// Common types and constants (addresses, registers, errors).
pub mod common;
/// Listing configuration (defaults, output format, hierarchical config structures).
pub mod config;
/// Instruction set (decode, instruction, ABI, rendering, RV64I encodings).
pub mod isa;
/// Semantic lifter, control-flow metadata and IL evaluator.
pub mod lift;
/// Code image loading from ELF or raw files.
pub mod loader;
/// Linear sweep over a code buffer and summary statistics.
pub mod sweep;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// RV64 processor module implementing the host interface.
pub use crate::arch::{Architecture, RiscV64};
/// Decoded instruction record.
pub use crate::isa::Instruction;
