//! Architecture Glue.
//!
//! The seam between the decoder/lifter and an analysis host. The host asks
//! per-address questions through the [`Architecture`] trait:
//! 1. **Geometry:** Endianness, address size, instruction width and alignment.
//! 2. **Per-Instruction Queries:** Length and control-flow edges, rendered text tokens,
//!    and lifted IL. Each query decodes first; an undecodable location is reported as
//!    an error (a zero-length instruction to the host) and is never lifted.
//! 3. **Register Metadata:** Names, layout, the full register list and the special
//!    stack and link registers.

use tracing::debug;

use crate::common::constants::{INSTRUCTION_BYTES, XLEN_BYTES};
use crate::common::reg::{ALL_REGISTERS, register_name};
use crate::common::{DecodeError, Register, RegisterInfo, VirtAddr};
use crate::isa::abi::{CallingConvention, LP64, REG_RA, REG_SP};
use crate::isa::decode::decode_bytes;
use crate::isa::disasm::{Token, render};
use crate::isa::instruction::Instruction;
use crate::lift::{InstructionInfo, Stmt, instruction_info, lift};

/// Byte order of instruction and data words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// Per-address queries an analysis host makes of a processor module.
pub trait Architecture: Send + Sync {
    /// Architecture name.
    fn name(&self) -> &'static str;

    /// Byte order.
    fn endianness(&self) -> Endianness;

    /// Address width in bytes.
    fn address_size(&self) -> usize;

    /// Natural integer width in bytes.
    fn default_integer_size(&self) -> usize;

    /// Longest instruction in bytes.
    fn max_instruction_length(&self) -> usize;

    /// Required instruction alignment in bytes.
    fn instruction_alignment(&self) -> usize;

    /// Decodes the instruction at `data` and reports its length and edges.
    ///
    /// # Arguments
    ///
    /// * `data` - Bytes starting at `address`.
    /// * `address` - Address of the first byte.
    /// * `max_len` - Number of readable bytes the host guarantees.
    fn instruction_info(
        &self,
        data: &[u8],
        address: u64,
        max_len: usize,
    ) -> Result<InstructionInfo, DecodeError>;

    /// Decodes and renders the instruction at `data`.
    ///
    /// # Returns
    ///
    /// The consumed length and the text tokens.
    fn instruction_text(
        &self,
        data: &[u8],
        address: u64,
        max_len: usize,
    ) -> Result<(usize, Vec<Token>), DecodeError>;

    /// Decodes and lifts the instruction at `data`.
    ///
    /// # Returns
    ///
    /// The consumed length and the lifted statements.
    fn instruction_il(
        &self,
        data: &[u8],
        address: u64,
        max_len: usize,
    ) -> Result<(usize, Vec<Stmt>), DecodeError>;

    /// Name of a register number; unknown numbers render as `x<N>`.
    fn register_name(&self, reg: usize) -> String;

    /// Layout of a register number, or `None` if it is not modeled.
    fn register_info(&self, reg: usize) -> Option<RegisterInfo>;

    /// Every modeled register.
    fn all_registers(&self) -> &'static [Register];

    /// Stack pointer register.
    fn stack_pointer_register(&self) -> Register;

    /// Link register.
    fn link_register(&self) -> Register;

    /// Default calling convention.
    fn calling_convention(&self) -> &'static CallingConvention;
}

/// RV64I processor module.
#[derive(Clone, Copy, Debug, Default)]
pub struct RiscV64;

impl RiscV64 {
    /// Creates the processor module.
    pub const fn new() -> Self {
        Self
    }

    fn decode_at(data: &[u8], address: u64, max_len: usize) -> Result<Instruction, DecodeError> {
        decode_bytes(data, address, Some(max_len))
            .inspect_err(|err| log_undecodable(address, err))
    }
}

fn log_undecodable(address: u64, err: &DecodeError) {
    debug!(address = %VirtAddr::new(address), %err, "undecodable location");
}

impl Architecture for RiscV64 {
    fn name(&self) -> &'static str {
        "rv64"
    }

    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    fn address_size(&self) -> usize {
        XLEN_BYTES
    }

    fn default_integer_size(&self) -> usize {
        XLEN_BYTES
    }

    fn max_instruction_length(&self) -> usize {
        INSTRUCTION_BYTES
    }

    fn instruction_alignment(&self) -> usize {
        INSTRUCTION_BYTES
    }

    fn instruction_info(
        &self,
        data: &[u8],
        address: u64,
        max_len: usize,
    ) -> Result<InstructionInfo, DecodeError> {
        instruction_info(data, address, Some(max_len))
            .inspect_err(|err| log_undecodable(address, err))
    }

    fn instruction_text(
        &self,
        data: &[u8],
        address: u64,
        max_len: usize,
    ) -> Result<(usize, Vec<Token>), DecodeError> {
        let inst = Self::decode_at(data, address, max_len)?;
        Ok((INSTRUCTION_BYTES, render(&inst, address)))
    }

    fn instruction_il(
        &self,
        data: &[u8],
        address: u64,
        max_len: usize,
    ) -> Result<(usize, Vec<Stmt>), DecodeError> {
        let inst = Self::decode_at(data, address, max_len)?;
        Ok((INSTRUCTION_BYTES, lift(&inst, address)))
    }

    fn register_name(&self, reg: usize) -> String {
        register_name(reg)
    }

    fn register_info(&self, reg: usize) -> Option<RegisterInfo> {
        Register::from_index(reg).map(Register::info)
    }

    fn all_registers(&self) -> &'static [Register] {
        &ALL_REGISTERS
    }

    fn stack_pointer_register(&self) -> Register {
        Register::gpr(REG_SP)
    }

    fn link_register(&self) -> Register {
        Register::gpr(REG_RA)
    }

    fn calling_convention(&self) -> &'static CallingConvention {
        &LP64
    }
}
