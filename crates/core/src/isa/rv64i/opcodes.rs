//! RV64I Major Opcodes.
//!
//! The 7-bit field in bits 6-0 selects the instruction format and the table
//! used to resolve `funct3`/`funct7`.

/// Load instructions (LB, LH, LW, LD, LBU, LHU, LWU).
pub const OP_LOAD: u32 = 0b0000011;

/// Memory ordering (FENCE).
pub const OP_MISC_MEM: u32 = 0b0001111;

/// Immediate arithmetic (ADDI, SLTI, ANDI, SLLI, ...).
pub const OP_IMM: u32 = 0b0010011;

/// Add Upper Immediate to PC.
pub const OP_AUIPC: u32 = 0b0010111;

/// 32-bit immediate arithmetic (ADDIW, SLLIW, SRLIW, SRAIW).
pub const OP_IMM_32: u32 = 0b0011011;

/// Store instructions (SB, SH, SW, SD).
pub const OP_STORE: u32 = 0b0100011;

/// Register-register arithmetic (ADD, SUB, SLL, ...).
pub const OP_REG: u32 = 0b0110011;

/// Load Upper Immediate.
pub const OP_LUI: u32 = 0b0110111;

/// 32-bit register-register arithmetic (ADDW, SUBW, SLLW, SRLW, SRAW).
pub const OP_REG_32: u32 = 0b0111011;

/// Conditional branches (BEQ, BNE, BLT, BGE, BLTU, BGEU).
pub const OP_BRANCH: u32 = 0b1100011;

/// Jump and Link Register.
pub const OP_JALR: u32 = 0b1100111;

/// Jump and Link.
pub const OP_JAL: u32 = 0b1101111;

/// Environment call and breakpoint.
pub const OP_SYSTEM: u32 = 0b1110011;

/// Full encoding of ECALL.
pub const ECALL: u32 = 0x0000_0073;

/// Full encoding of EBREAK.
pub const EBREAK: u32 = 0x0010_0073;
