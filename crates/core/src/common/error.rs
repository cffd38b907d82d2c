//! Error types.
//!
//! This module defines the failure outcomes surfaced by the crate. It provides:
//! 1. **Decode Errors:** Why a location could not be decoded (truncated, unknown opcode,
//!    unknown function bits). An undecodable word is an ordinary return value, never a panic.
//! 2. **Load Errors:** I/O and object-file failures while reading an image from disk.
//! 3. **Config Errors:** Malformed configuration documents.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Reason a location could not be decoded as an instruction.
///
/// There is no partially-decoded state: any of these collapses the location
/// to "undecodable", which the host treats as a zero-length instruction.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    /// Fewer than four bytes are available at the address.
    #[error("truncated instruction at {address:#x}: need {needed} bytes, have {available}")]
    Truncated {
        /// Address of the first byte.
        address: u64,
        /// Bytes required for a full instruction word.
        needed: usize,
        /// Bytes the caller made available.
        available: usize,
    },

    /// The major opcode is outside the supported set.
    #[error("unknown opcode {opcode:#09b} at {address:#x} (word {word:#010x})")]
    UnknownOpcode {
        /// Address of the instruction.
        address: u64,
        /// Raw instruction word.
        word: u32,
        /// The 7-bit major opcode.
        opcode: u32,
    },

    /// The opcode is supported but the funct3/funct7 combination is not.
    #[error(
        "unknown function bits at {address:#x} (word {word:#010x}): opcode {opcode:#09b}, funct3 {funct3:#05b}, funct7 {funct7:#09b}"
    )]
    UnknownFunction {
        /// Address of the instruction.
        address: u64,
        /// Raw instruction word.
        word: u32,
        /// The 7-bit major opcode.
        opcode: u32,
        /// The funct3 field.
        funct3: u32,
        /// The funct7 field.
        funct7: u32,
    },
}

impl DecodeError {
    /// Creates a new `Truncated` error.
    pub const fn truncated(address: u64, needed: usize, available: usize) -> Self {
        Self::Truncated {
            address,
            needed,
            available,
        }
    }

    /// Returns the address the error refers to.
    pub const fn address(&self) -> u64 {
        match self {
            Self::Truncated { address, .. }
            | Self::UnknownOpcode { address, .. }
            | Self::UnknownFunction { address, .. } => *address,
        }
    }

    /// Returns the raw word, if one could be read.
    pub const fn word(&self) -> Option<u32> {
        match self {
            Self::Truncated { .. } => None,
            Self::UnknownOpcode { word, .. } | Self::UnknownFunction { word, .. } => Some(*word),
        }
    }
}

/// Failure while reading a code image from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file looked like an object file but could not be parsed.
    #[error("malformed object file '{path}': {source}")]
    Object {
        /// Path that was being parsed.
        path: PathBuf,
        /// Underlying parser error.
        #[source]
        source: object::Error,
    },

    /// The object file is for another architecture.
    #[error("'{path}' is not a RISC-V image (architecture {arch})")]
    WrongArchitecture {
        /// Path of the image.
        path: PathBuf,
        /// Architecture reported by the object file.
        arch: String,
    },
}

/// Failure while parsing a configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("could not read config '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for [`crate::config::Config`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
