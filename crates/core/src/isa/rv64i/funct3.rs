//! `funct3` selectors (bits 14-12), grouped by the major opcode that reads them.
//!
//! The same value means different things under different opcodes: `0b000` is
//! `lb` under LOAD, `beq` under BRANCH and `add`/`sub` under OP.

// LOAD: width in the low two bits, bit 2 set for zero-extension.

/// `lb`
pub const LB: u32 = 0b000;
/// `lh`
pub const LH: u32 = 0b001;
/// `lw`
pub const LW: u32 = 0b010;
/// `ld`
pub const LD: u32 = 0b011;
/// `lbu`
pub const LBU: u32 = 0b100;
/// `lhu`
pub const LHU: u32 = 0b101;
/// `lwu`
pub const LWU: u32 = 0b110;

// STORE: width only.

/// `sb`
pub const SB: u32 = LB;
/// `sh`
pub const SH: u32 = LH;
/// `sw`
pub const SW: u32 = LW;
/// `sd`
pub const SD: u32 = LD;

// BRANCH: 0b010 and 0b011 are reserved.

/// `beq`
pub const BEQ: u32 = 0b000;
/// `bne`
pub const BNE: u32 = 0b001;
/// `blt`, signed.
pub const BLT: u32 = 0b100;
/// `bge`, signed.
pub const BGE: u32 = 0b101;
/// `bltu`
pub const BLTU: u32 = 0b110;
/// `bgeu`
pub const BGEU: u32 = 0b111;

// OP, OP-IMM and their 32-bit forms share the ALU selector.

/// `add`/`sub` (`addi`, `addw`, `subw`, `addiw`); funct7 picks subtraction.
pub const ADD_SUB: u32 = 0b000;
/// Left shift.
pub const SLL: u32 = 0b001;
/// Signed set-less-than.
pub const SLT: u32 = 0b010;
/// Unsigned set-less-than.
pub const SLTU: u32 = 0b011;
/// Exclusive or.
pub const XOR: u32 = 0b100;
/// Right shift; funct7 (funct6 for RV64 immediates) picks arithmetic.
pub const SRL_SRA: u32 = 0b101;
/// Inclusive or.
pub const OR: u32 = 0b110;
/// And.
pub const AND: u32 = 0b111;

/// `fence` under MISC-MEM.
pub const FENCE: u32 = 0b000;

/// `jalr` accepts only this value.
pub const JALR: u32 = 0b000;
