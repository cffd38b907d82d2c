//! RISC-V Instruction Decoder.
//!
//! Turns a 32-bit RV64I encoding into an [`Instruction`]. Decoding runs in three steps:
//! 1. **Format:** The major opcode selects the encoding format and the resolution table.
//! 2. **Operation:** `funct3` (and `funct7`/`funct6` where the encoding has one) selects the
//!    mnemonic. Any unmatched combination makes the whole word undecodable.
//! 3. **Pseudo-instructions:** `jal x0` becomes `j`, `addi rd, x0, imm` becomes `li`,
//!    `addi rd, rs, 0` becomes `mv` and `jalr x0` becomes `ret`.
//!
//! The decoder is a pure function of `(word, address)`; the address only matters for
//! rebasing the `j` target.

use crate::common::{DecodeError, INSTRUCTION_BYTES, VirtAddr};
use crate::isa::instruction::{Format, Instruction, InstructionBits, Mnemonic};
use crate::isa::rv64i::{funct3, funct7, opcodes};

/// Total width of a RISC-V instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

/// Bit shift for the I-Type immediate (bits 20-31).
const I_IMM_SHIFT: u32 = 20;

/// S-Type: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`.
const S_IMM_LOW_SHIFT: u32 = 7;
const S_IMM_LOW_MASK: u32 = 0x1F;
const S_IMM_HIGH_SHIFT: u32 = 25;
const S_IMM_HIGH_MASK: u32 = 0x7F;
const S_IMM_BITS: u32 = 12;

/// B-Type: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`.
const B_IMM_11_SHIFT: u32 = 7;
const B_IMM_4_1_SHIFT: u32 = 8;
const B_IMM_4_1_MASK: u32 = 0xF;
const B_IMM_10_5_SHIFT: u32 = 25;
const B_IMM_10_5_MASK: u32 = 0x3F;
const B_IMM_12_SHIFT: u32 = 31;
const B_IMM_BITS: u32 = 13;

/// U-Type: `imm[31:12] | rd | opcode`, low 12 bits zero.
const U_IMM_MASK: u32 = 0xFFFF_F000;

/// J-Type: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`.
const J_IMM_19_12_SHIFT: u32 = 12;
const J_IMM_19_12_MASK: u32 = 0xFF;
const J_IMM_11_SHIFT: u32 = 20;
const J_IMM_10_1_SHIFT: u32 = 21;
const J_IMM_10_1_MASK: u32 = 0x3FF;
const J_IMM_20_SHIFT: u32 = 31;
const J_IMM_BITS: u32 = 21;

/// Shift amount mask for 64-bit immediate shifts (6 bits).
const SHAMT_MASK_RV64: u32 = 0x3F;

/// Shift amount mask for word immediate shifts (5 bits).
const SHAMT_MASK_RV32: u32 = 0x1F;

/// Decodes a word, collapsing every failure to [`Instruction::error`].
///
/// # Arguments
///
/// * `word` - The 32-bit instruction encoding.
/// * `address` - Address the word was fetched from.
pub fn decode(word: u32, address: u64) -> Instruction {
    try_decode(word, address).unwrap_or_else(|_| Instruction::error(word))
}

/// Decodes a word, reporting why it is undecodable on failure.
///
/// # Arguments
///
/// * `word` - The 32-bit instruction encoding.
/// * `address` - Address the word was fetched from.
///
/// # Returns
///
/// The decoded instruction, or `UnknownOpcode` / `UnknownFunction`.
pub fn try_decode(word: u32, address: u64) -> Result<Instruction, DecodeError> {
    let opcode = word.opcode();
    let f3 = word.funct3();
    let unknown_function = || DecodeError::UnknownFunction {
        address,
        word,
        opcode,
        funct3: f3,
        funct7: word.funct7(),
    };

    let inst = match opcode {
        opcodes::OP_LUI => u_type(word, Mnemonic::Lui),
        opcodes::OP_AUIPC => u_type(word, Mnemonic::Auipc),
        opcodes::OP_JAL => j_type(word, Mnemonic::Jal),
        opcodes::OP_JALR if f3 == funct3::JALR => i_type(word, Mnemonic::Jalr),
        opcodes::OP_BRANCH => b_type(word, branch_op(f3).ok_or_else(unknown_function)?),
        opcodes::OP_LOAD => i_type(word, load_op(f3).ok_or_else(unknown_function)?),
        opcodes::OP_STORE => s_type(word, store_op(f3).ok_or_else(unknown_function)?),
        opcodes::OP_IMM => op_imm(word).ok_or_else(unknown_function)?,
        opcodes::OP_IMM_32 => op_imm_32(word).ok_or_else(unknown_function)?,
        opcodes::OP_REG => r_type(word, reg_op(f3, word.funct7()).ok_or_else(unknown_function)?),
        opcodes::OP_REG_32 => r_type(
            word,
            reg_op_32(f3, word.funct7()).ok_or_else(unknown_function)?,
        ),
        opcodes::OP_MISC_MEM if f3 == funct3::FENCE => i_type(word, Mnemonic::Fence),
        opcodes::OP_SYSTEM if word == opcodes::ECALL => i_type(word, Mnemonic::Ecall),
        opcodes::OP_SYSTEM if word == opcodes::EBREAK => i_type(word, Mnemonic::Ebreak),
        opcodes::OP_JALR | opcodes::OP_MISC_MEM | opcodes::OP_SYSTEM => {
            return Err(unknown_function());
        }
        _ => {
            return Err(DecodeError::UnknownOpcode {
                address,
                word,
                opcode,
            });
        }
    };

    Ok(reclassify(inst, address))
}

/// Decodes the instruction at the start of a byte buffer.
///
/// Reads a little-endian word only when at least four bytes are available,
/// where the available length is `data.len()` capped by `max_len`.
///
/// # Arguments
///
/// * `data` - Bytes starting at `address`.
/// * `address` - Address of the first byte.
/// * `max_len` - Optional caller-declared limit on readable bytes.
pub fn decode_bytes(
    data: &[u8],
    address: u64,
    max_len: Option<usize>,
) -> Result<Instruction, DecodeError> {
    let available = max_len.map_or(data.len(), |limit| limit.min(data.len()));
    if available < INSTRUCTION_BYTES {
        return Err(DecodeError::truncated(
            address,
            INSTRUCTION_BYTES,
            available,
        ));
    }
    let bytes = data
        .first_chunk::<INSTRUCTION_BYTES>()
        .ok_or_else(|| DecodeError::truncated(address, INSTRUCTION_BYTES, available))?;
    try_decode(u32::from_le_bytes(*bytes), address)
}

/// Rewrites canonical encodings into their pseudo-instruction forms.
fn reclassify(mut inst: Instruction, address: u64) -> Instruction {
    match inst.mnemonic {
        Mnemonic::Jal if inst.rd == 0 => {
            inst.mnemonic = Mnemonic::J;
            inst.imm = VirtAddr::new(address).offset(inst.imm).val() as i64;
        }
        Mnemonic::Addi if inst.rs1 == 0 => inst.mnemonic = Mnemonic::Li,
        Mnemonic::Addi if inst.imm == 0 => inst.mnemonic = Mnemonic::Mv,
        Mnemonic::Jalr if inst.rd == 0 => inst.mnemonic = Mnemonic::Ret,
        _ => {}
    }
    inst
}

fn branch_op(f3: u32) -> Option<Mnemonic> {
    Some(match f3 {
        funct3::BEQ => Mnemonic::Beq,
        funct3::BNE => Mnemonic::Bne,
        funct3::BLT => Mnemonic::Blt,
        funct3::BGE => Mnemonic::Bge,
        funct3::BLTU => Mnemonic::Bltu,
        funct3::BGEU => Mnemonic::Bgeu,
        _ => return None,
    })
}

fn load_op(f3: u32) -> Option<Mnemonic> {
    Some(match f3 {
        funct3::LB => Mnemonic::Lb,
        funct3::LH => Mnemonic::Lh,
        funct3::LW => Mnemonic::Lw,
        funct3::LD => Mnemonic::Ld,
        funct3::LBU => Mnemonic::Lbu,
        funct3::LHU => Mnemonic::Lhu,
        funct3::LWU => Mnemonic::Lwu,
        _ => return None,
    })
}

fn store_op(f3: u32) -> Option<Mnemonic> {
    Some(match f3 {
        funct3::SB => Mnemonic::Sb,
        funct3::SH => Mnemonic::Sh,
        funct3::SW => Mnemonic::Sw,
        funct3::SD => Mnemonic::Sd,
        _ => return None,
    })
}

fn reg_op(f3: u32, f7: u32) -> Option<Mnemonic> {
    Some(match (f7, f3) {
        (funct7::DEFAULT, funct3::ADD_SUB) => Mnemonic::Add,
        (funct7::ALT, funct3::ADD_SUB) => Mnemonic::Sub,
        (funct7::DEFAULT, funct3::SLL) => Mnemonic::Sll,
        (funct7::DEFAULT, funct3::SLT) => Mnemonic::Slt,
        (funct7::DEFAULT, funct3::SLTU) => Mnemonic::Sltu,
        (funct7::DEFAULT, funct3::XOR) => Mnemonic::Xor,
        (funct7::DEFAULT, funct3::SRL_SRA) => Mnemonic::Srl,
        (funct7::ALT, funct3::SRL_SRA) => Mnemonic::Sra,
        (funct7::DEFAULT, funct3::OR) => Mnemonic::Or,
        (funct7::DEFAULT, funct3::AND) => Mnemonic::And,
        _ => return None,
    })
}

fn reg_op_32(f3: u32, f7: u32) -> Option<Mnemonic> {
    Some(match (f7, f3) {
        (funct7::DEFAULT, funct3::ADD_SUB) => Mnemonic::Addw,
        (funct7::ALT, funct3::ADD_SUB) => Mnemonic::Subw,
        (funct7::DEFAULT, funct3::SLL) => Mnemonic::Sllw,
        (funct7::DEFAULT, funct3::SRL_SRA) => Mnemonic::Srlw,
        (funct7::ALT, funct3::SRL_SRA) => Mnemonic::Sraw,
        _ => return None,
    })
}

/// Resolves OP-IMM. Shifts take a 6-bit shift amount and are keyed on funct6.
fn op_imm(word: u32) -> Option<Instruction> {
    let mnemonic = match word.funct3() {
        funct3::ADD_SUB => Mnemonic::Addi,
        funct3::SLT => Mnemonic::Slti,
        funct3::SLTU => Mnemonic::Sltiu,
        funct3::XOR => Mnemonic::Xori,
        funct3::OR => Mnemonic::Ori,
        funct3::AND => Mnemonic::Andi,
        funct3::SLL if word.funct6() == funct7::SHIFT6_DEFAULT => {
            return Some(shift_type(word, Mnemonic::Slli, SHAMT_MASK_RV64));
        }
        funct3::SRL_SRA => {
            let mnemonic = match word.funct6() {
                funct7::SHIFT6_DEFAULT => Mnemonic::Srli,
                funct7::SHIFT6_ARITH => Mnemonic::Srai,
                _ => return None,
            };
            return Some(shift_type(word, mnemonic, SHAMT_MASK_RV64));
        }
        _ => return None,
    };
    Some(i_type(word, mnemonic))
}

/// Resolves OP-IMM-32. Word shifts take a 5-bit shift amount keyed on funct7.
fn op_imm_32(word: u32) -> Option<Instruction> {
    let mnemonic = match (word.funct3(), word.funct7()) {
        (funct3::ADD_SUB, _) => return Some(i_type(word, Mnemonic::Addiw)),
        (funct3::SLL, funct7::DEFAULT) => Mnemonic::Slliw,
        (funct3::SRL_SRA, funct7::DEFAULT) => Mnemonic::Srliw,
        (funct3::SRL_SRA, funct7::ALT) => Mnemonic::Sraiw,
        _ => return None,
    };
    Some(shift_type(word, mnemonic, SHAMT_MASK_RV32))
}

/// Builds an R-Type record: `rd`, `rs1`, `rs2`, `funct3`, `funct7`.
fn r_type(word: u32, mnemonic: Mnemonic) -> Instruction {
    Instruction {
        format: Format::R,
        mnemonic,
        rd: word.rd(),
        rs1: word.rs1(),
        rs2: word.rs2(),
        funct3: word.funct3(),
        funct7: word.funct7(),
        ..Instruction::error(word)
    }
}

/// Builds an I-Type record: `rd`, `rs1`, `funct3`, 12-bit signed immediate.
fn i_type(word: u32, mnemonic: Mnemonic) -> Instruction {
    Instruction {
        format: Format::I,
        mnemonic,
        rd: word.rd(),
        rs1: word.rs1(),
        funct3: word.funct3(),
        imm: decode_i_type_imm(word),
        ..Instruction::error(word)
    }
}

/// Builds an I-Type shift record. The immediate is the unsigned shift amount
/// and `funct7` is kept for disambiguation.
fn shift_type(word: u32, mnemonic: Mnemonic, shamt_mask: u32) -> Instruction {
    Instruction {
        funct7: word.funct7(),
        imm: i64::from((word >> I_IMM_SHIFT) & shamt_mask),
        ..i_type(word, mnemonic)
    }
}

/// Builds an S-Type record: `rs1`, `rs2`, `funct3`, split immediate.
fn s_type(word: u32, mnemonic: Mnemonic) -> Instruction {
    Instruction {
        format: Format::S,
        mnemonic,
        rs1: word.rs1(),
        rs2: word.rs2(),
        funct3: word.funct3(),
        imm: decode_s_type_imm(word),
        ..Instruction::error(word)
    }
}

/// Builds a B-Type record: `rs1`, `rs2`, `funct3`, even PC-relative offset.
fn b_type(word: u32, mnemonic: Mnemonic) -> Instruction {
    Instruction {
        format: Format::B,
        mnemonic,
        rs1: word.rs1(),
        rs2: word.rs2(),
        funct3: word.funct3(),
        imm: decode_b_type_imm(word),
        ..Instruction::error(word)
    }
}

/// Builds a U-Type record: `rd` and the shifted upper immediate.
fn u_type(word: u32, mnemonic: Mnemonic) -> Instruction {
    Instruction {
        format: Format::U,
        mnemonic,
        rd: word.rd(),
        imm: decode_u_type_imm(word),
        ..Instruction::error(word)
    }
}

/// Builds a J-Type record: `rd` and the even PC-relative offset.
fn j_type(word: u32, mnemonic: Mnemonic) -> Instruction {
    Instruction {
        format: Format::J,
        mnemonic,
        rd: word.rd(),
        imm: decode_j_type_imm(word),
        ..Instruction::error(word)
    }
}

fn decode_i_type_imm(inst: u32) -> i64 {
    i64::from((inst as i32) >> I_IMM_SHIFT)
}

fn decode_s_type_imm(inst: u32) -> i64 {
    let low = (inst >> S_IMM_LOW_SHIFT) & S_IMM_LOW_MASK;
    let high = (inst >> S_IMM_HIGH_SHIFT) & S_IMM_HIGH_MASK;
    sign_extend((high << 5) | low, S_IMM_BITS)
}

fn decode_b_type_imm(inst: u32) -> i64 {
    let bit_11 = (inst >> B_IMM_11_SHIFT) & 1;
    let bits_4_1 = (inst >> B_IMM_4_1_SHIFT) & B_IMM_4_1_MASK;
    let bits_10_5 = (inst >> B_IMM_10_5_SHIFT) & B_IMM_10_5_MASK;
    let bit_12 = (inst >> B_IMM_12_SHIFT) & 1;

    let combined = (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1);
    sign_extend(combined, B_IMM_BITS)
}

fn decode_u_type_imm(inst: u32) -> i64 {
    i64::from((inst & U_IMM_MASK) as i32)
}

fn decode_j_type_imm(inst: u32) -> i64 {
    let bits_19_12 = (inst >> J_IMM_19_12_SHIFT) & J_IMM_19_12_MASK;
    let bit_11 = (inst >> J_IMM_11_SHIFT) & 1;
    let bits_10_1 = (inst >> J_IMM_10_1_SHIFT) & J_IMM_10_1_MASK;
    let bit_20 = (inst >> J_IMM_20_SHIFT) & 1;

    let combined = (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1);
    sign_extend(combined, J_IMM_BITS)
}

/// Sign extends a value of `bits` width to a 64-bit signed integer.
///
/// # Arguments
///
/// * `val` - The value to extend.
/// * `bits` - The number of valid bits in `val`.
const fn sign_extend(val: u32, bits: u32) -> i64 {
    let shift = INSTRUCTION_WIDTH - bits;
    (((val << shift) as i32) >> shift) as i64
}
