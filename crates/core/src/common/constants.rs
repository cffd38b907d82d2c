//! Global constants.
//!
//! This module defines crate-wide constants. It includes:
//! 1. **Instruction Constants:** Width of a base (uncompressed) instruction word.
//! 2. **Register Constants:** Size of the modeled register file and register width.
//! 3. **Rendering Constants:** Column layout used by the text renderer.

/// Size of a base RISC-V instruction in bytes, as an address increment.
pub const INSTRUCTION_SIZE: u64 = 4;

/// Size of a base RISC-V instruction in bytes, as a buffer length.
pub const INSTRUCTION_BYTES: usize = 4;

/// Number of modeled registers: x0–x31 plus the program counter.
pub const REGISTER_COUNT: usize = 33;

/// Number of general-purpose registers addressable from an instruction field.
pub const GPR_COUNT: usize = 32;

/// Width of every modeled register in bytes (XLEN = 64).
pub const XLEN_BYTES: usize = 8;

/// Column width the mnemonic is padded to in rendered text.
pub const MNEMONIC_PADDING: usize = 6;

/// Default load address for raw (non-ELF) images.
pub const DEFAULT_BASE_ADDRESS: u64 = 0x1_0000;
