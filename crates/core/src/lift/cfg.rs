//! Control-flow edge metadata.
//!
//! Reports the outgoing edges of a single instruction so a host can build basic
//! blocks. No cross-instruction analysis happens here.

use serde::Serialize;

use crate::common::{DecodeError, INSTRUCTION_BYTES, INSTRUCTION_SIZE, VirtAddr};
use crate::isa::decode::decode_bytes;
use crate::isa::instruction::{Instruction, Mnemonic};

/// Kind of a control-flow edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    /// Taken side of a conditional branch.
    TrueBranch,
    /// Fall-through side of a conditional branch.
    FalseBranch,
    /// Unconditional jump.
    UnconditionalBranch,
    /// Subroutine call; execution resumes after the instruction.
    Call,
    /// Subroutine return.
    FunctionReturn,
}

/// An outgoing edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Branch {
    /// Edge kind.
    pub kind: BranchKind,
    /// Destination, or `None` when it depends on a register value.
    pub target: Option<u64>,
}

impl Branch {
    const fn to(kind: BranchKind, target: u64) -> Self {
        Self {
            kind,
            target: Some(target),
        }
    }

    const fn indirect(kind: BranchKind) -> Self {
        Self { kind, target: None }
    }
}

/// Length and edges of one instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstructionInfo {
    /// Instruction length in bytes.
    pub length: usize,
    /// Outgoing edges; empty for straight-line code.
    pub branches: Vec<Branch>,
}

/// Returns the outgoing edges of an instruction.
///
/// # Arguments
///
/// * `inst` - The decoded instruction.
/// * `address` - Address it was decoded at.
pub fn branches(inst: &Instruction, address: u64) -> Vec<Branch> {
    let pc = VirtAddr::new(address);
    match inst.mnemonic {
        m if m.is_branch() => vec![
            Branch::to(BranchKind::TrueBranch, pc.offset(inst.imm).val()),
            Branch::to(BranchKind::FalseBranch, pc.advance(INSTRUCTION_SIZE).val()),
        ],
        Mnemonic::J => vec![Branch {
            kind: BranchKind::UnconditionalBranch,
            target: inst.target(address),
        }],
        Mnemonic::Jal | Mnemonic::Jalr => vec![Branch {
            kind: BranchKind::Call,
            target: inst.target(address),
        }],
        Mnemonic::Ret => vec![Branch::indirect(BranchKind::FunctionReturn)],
        _ => Vec::new(),
    }
}

/// Decodes the instruction at the start of `data` and reports its length and edges.
///
/// # Arguments
///
/// * `data` - Bytes starting at `address`.
/// * `address` - Address of the first byte.
/// * `max_len` - Optional caller-declared limit on readable bytes.
///
/// # Returns
///
/// The instruction info, or the reason the location is undecodable.
pub fn instruction_info(
    data: &[u8],
    address: u64,
    max_len: Option<usize>,
) -> Result<InstructionInfo, DecodeError> {
    let inst = decode_bytes(data, address, max_len)?;
    Ok(InstructionInfo {
        length: INSTRUCTION_BYTES,
        branches: branches(&inst, address),
    })
}
