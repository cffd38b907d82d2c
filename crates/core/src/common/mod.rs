//! Common utilities and types shared by the decoder, lifter and glue layers.
//!
//! This module provides the fundamental building blocks used across the crate. It includes:
//! 1. **Address Types:** A strong type for virtual addresses with wrapping offset arithmetic.
//! 2. **Constants:** Instruction width, register-file size and rendering constants.
//! 3. **Error Handling:** Decode, load and configuration error types.
//! 4. **Registers:** The 33-entry register file description (names, classes, widths).

/// Address type definitions.
pub mod addr;

/// Common constants used throughout the crate.
pub mod constants;

/// Error types for decoding, image loading and configuration.
pub mod error;

/// Register identifiers, ABI names and register metadata.
pub mod reg;

pub use addr::VirtAddr;
pub use constants::{INSTRUCTION_BYTES, INSTRUCTION_SIZE, REGISTER_COUNT};
pub use error::{ConfigError, DecodeError, LoadError};
pub use reg::{ImplicitExtend, Register, RegisterClass, RegisterInfo};
