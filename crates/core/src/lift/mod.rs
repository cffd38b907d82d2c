//! Semantic lifter.
//!
//! Translates one decoded [`Instruction`] into register-transfer [`Stmt`]s. The
//! translation is a pure function of the record and its address, and follows these rules:
//! 1. **Zero Register:** Reads of `x0` become the constant 0; writes to `x0` are dropped
//!    (a `nop` remains if nothing else does). Stores are never dropped.
//! 2. **Word Operations:** `*w` instructions compute on the low 32 bits and write the
//!    destination at word width, which the register file sign-extends.
//! 3. **Control Flow:** Branches become a two-way `if`; `jal`/`jalr` with a link register
//!    become a call, `j` a jump and `ret` a return. Targets of `jalr` clear bit 0.
//! 4. **Unsupported:** Undecodable records lift to `unimplemented`.

/// Control-flow edge metadata.
pub mod cfg;

/// Reference evaluator for lifted statements.
pub mod eval;

/// IL vocabulary: expressions, statements and widths.
pub mod il;

use tracing::trace;

pub use self::cfg::{Branch, BranchKind, InstructionInfo, branches, instruction_info};
pub use self::il::{BinaryOp, Condition, Expr, Stmt, TempId, Width};

use crate::common::{INSTRUCTION_SIZE, Register, VirtAddr};
use crate::isa::abi::REG_ZERO;
use crate::isa::instruction::{Instruction, Mnemonic};

/// Shift amount mask for 64-bit shifts.
const SHAMT_MASK_RV64: u64 = 0x3F;

/// Shift amount mask for 32-bit (word) shifts.
const SHAMT_MASK_RV32: u64 = 0x1F;

/// Temporary used to stage a `jalr` target that the link write would clobber.
const JALR_TARGET_TEMP: TempId = 0;

/// Lifts one instruction.
///
/// # Arguments
///
/// * `inst` - The decoded instruction.
/// * `address` - Address it was decoded at.
///
/// # Returns
///
/// At least one statement describing the instruction's effect.
pub fn lift(inst: &Instruction, address: u64) -> Vec<Stmt> {
    let pc = VirtAddr::new(address);
    let next = pc.advance(INSTRUCTION_SIZE).val();
    let imm = inst.imm;

    let stmts = match inst.mnemonic {
        Mnemonic::Lui => vec![set(inst.rd, Expr::constant(imm as u64))],
        Mnemonic::Li => vec![set(inst.rd, Expr::ConstPtr(imm as u64))],
        Mnemonic::Auipc => vec![set(inst.rd, Expr::ConstPtr(pc.offset(imm).val()))],
        Mnemonic::Mv => vec![set(inst.rd, read(inst.rs1))],

        Mnemonic::Add => lift_r_type(inst, BinaryOp::Add),
        Mnemonic::Sub => lift_r_type(inst, BinaryOp::Sub),
        Mnemonic::Xor => lift_r_type(inst, BinaryOp::Xor),
        Mnemonic::Or => lift_r_type(inst, BinaryOp::Or),
        Mnemonic::And => lift_r_type(inst, BinaryOp::And),
        Mnemonic::Sll => lift_shift_reg(inst, BinaryOp::Shl, Width::Double),
        Mnemonic::Srl => lift_shift_reg(inst, BinaryOp::LogicalShr, Width::Double),
        Mnemonic::Sra => lift_shift_reg(inst, BinaryOp::ArithShr, Width::Double),
        Mnemonic::Slt => lift_set_less(inst.rd, read(inst.rs1), read(inst.rs2), true),
        Mnemonic::Sltu => lift_set_less(inst.rd, read(inst.rs1), read(inst.rs2), false),

        Mnemonic::Addi => lift_i_arith(inst, BinaryOp::Add),
        Mnemonic::Xori => lift_i_arith(inst, BinaryOp::Xor),
        Mnemonic::Ori => lift_i_arith(inst, BinaryOp::Or),
        Mnemonic::Andi => lift_i_arith(inst, BinaryOp::And),
        Mnemonic::Slti => lift_set_less(inst.rd, read(inst.rs1), Expr::constant(imm as u64), true),
        Mnemonic::Sltiu => {
            lift_set_less(inst.rd, read(inst.rs1), Expr::constant(imm as u64), false)
        }
        Mnemonic::Slli => lift_shift_imm(inst, BinaryOp::Shl, Width::Double),
        Mnemonic::Srli => lift_shift_imm(inst, BinaryOp::LogicalShr, Width::Double),
        Mnemonic::Srai => lift_shift_imm(inst, BinaryOp::ArithShr, Width::Double),

        Mnemonic::Addiw => vec![set_word(
            inst.rd,
            Expr::binary(
                BinaryOp::Add,
                Width::Word,
                low(Width::Word, inst.rs1),
                Expr::constant_sized(Width::Word, imm as u64 & Width::Word.mask()),
            ),
        )],
        Mnemonic::Slliw => lift_shift_imm(inst, BinaryOp::Shl, Width::Word),
        Mnemonic::Srliw => lift_shift_imm(inst, BinaryOp::LogicalShr, Width::Word),
        Mnemonic::Sraiw => lift_shift_imm(inst, BinaryOp::ArithShr, Width::Word),
        Mnemonic::Addw => lift_r_word(inst, BinaryOp::Add),
        Mnemonic::Subw => lift_r_word(inst, BinaryOp::Sub),
        Mnemonic::Sllw => lift_shift_reg(inst, BinaryOp::Shl, Width::Word),
        Mnemonic::Srlw => lift_shift_reg(inst, BinaryOp::LogicalShr, Width::Word),
        Mnemonic::Sraw => lift_shift_reg(inst, BinaryOp::ArithShr, Width::Word),

        Mnemonic::Lb => lift_load(inst, Width::Byte, true),
        Mnemonic::Lh => lift_load(inst, Width::Half, true),
        Mnemonic::Lw => lift_load(inst, Width::Word, true),
        Mnemonic::Ld => lift_load(inst, Width::Double, true),
        Mnemonic::Lbu => lift_load(inst, Width::Byte, false),
        Mnemonic::Lhu => lift_load(inst, Width::Half, false),
        Mnemonic::Lwu => lift_load(inst, Width::Word, false),

        Mnemonic::Sb => lift_store(inst, Width::Byte),
        Mnemonic::Sh => lift_store(inst, Width::Half),
        Mnemonic::Sw => lift_store(inst, Width::Word),
        Mnemonic::Sd => lift_store(inst, Width::Double),

        Mnemonic::Beq
        | Mnemonic::Bne
        | Mnemonic::Blt
        | Mnemonic::Bge
        | Mnemonic::Bltu
        | Mnemonic::Bgeu => lift_branch(inst, address, next),

        Mnemonic::J => vec![Stmt::Jump(Expr::ConstPtr(imm as u64))],
        Mnemonic::Jal => vec![
            set(inst.rd, Expr::ConstPtr(next)),
            Stmt::Call(Expr::ConstPtr(pc.offset(imm).val())),
        ],
        Mnemonic::Jalr => lift_jalr(inst, next),
        Mnemonic::Ret => vec![Stmt::Return(indirect_target(inst))],

        Mnemonic::Ecall => vec![Stmt::Syscall],
        Mnemonic::Ebreak => vec![Stmt::Breakpoint],
        Mnemonic::Fence => vec![Stmt::Fence],
        Mnemonic::Unsupported => vec![Stmt::Unimplemented],
    };

    trace!(
        address = %pc,
        mnemonic = %inst.mnemonic,
        stmts = stmts.len(),
        "lifted instruction"
    );
    stmts
}

/// Reads a source register; `x0` is the constant 0.
fn read(idx: usize) -> Expr {
    if idx == REG_ZERO {
        Expr::constant(0)
    } else {
        Expr::Reg(Register::gpr(idx))
    }
}

/// Low `width` bytes of a source register; `x0` is a zero constant of that width.
fn low(width: Width, idx: usize) -> Expr {
    match (idx, width) {
        (REG_ZERO, _) => Expr::constant_sized(width, 0),
        (_, Width::Double) => read(idx),
        _ => Expr::low_part(width, read(idx)),
    }
}

/// Full-width register write, dropped for `x0`.
fn set(rd: usize, value: Expr) -> Stmt {
    set_sized(rd, Width::Double, value)
}

/// Word-width register write (sign-extended by the register file), dropped for `x0`.
fn set_word(rd: usize, value: Expr) -> Stmt {
    set_sized(rd, Width::Word, value)
}

fn set_sized(rd: usize, width: Width, value: Expr) -> Stmt {
    if rd == REG_ZERO {
        Stmt::Nop
    } else {
        Stmt::SetReg {
            width,
            reg: Register::gpr(rd),
            value,
        }
    }
}

/// `rd = rs1 op rs2`
fn lift_r_type(inst: &Instruction, op: BinaryOp) -> Vec<Stmt> {
    vec![set(
        inst.rd,
        Expr::binary(op, Width::Double, read(inst.rs1), read(inst.rs2)),
    )]
}

/// `rd.d = rs1.d op rs2.d`
fn lift_r_word(inst: &Instruction, op: BinaryOp) -> Vec<Stmt> {
    vec![set_word(
        inst.rd,
        Expr::binary(
            op,
            Width::Word,
            low(Width::Word, inst.rs1),
            low(Width::Word, inst.rs2),
        ),
    )]
}

/// `rd = rs1 op imm`
fn lift_i_arith(inst: &Instruction, op: BinaryOp) -> Vec<Stmt> {
    vec![set(
        inst.rd,
        Expr::binary(
            op,
            Width::Double,
            read(inst.rs1),
            Expr::constant(inst.imm as u64),
        ),
    )]
}

const fn shamt_mask(width: Width) -> u64 {
    match width {
        Width::Word => SHAMT_MASK_RV32,
        _ => SHAMT_MASK_RV64,
    }
}

/// `rd = rs1 op (rs2 & mask)`
fn lift_shift_reg(inst: &Instruction, op: BinaryOp, width: Width) -> Vec<Stmt> {
    let amount = Expr::binary(
        BinaryOp::And,
        width,
        low(width, inst.rs2),
        Expr::constant_sized(width, shamt_mask(width)),
    );
    let value = Expr::binary(op, width, low(width, inst.rs1), amount);
    vec![set_sized(inst.rd, width, value)]
}

/// `rd = rs1 op shamt`
fn lift_shift_imm(inst: &Instruction, op: BinaryOp, width: Width) -> Vec<Stmt> {
    let amount = Expr::constant_sized(width, inst.imm as u64 & shamt_mask(width));
    let value = Expr::binary(op, width, low(width, inst.rs1), amount);
    vec![set_sized(inst.rd, width, value)]
}

/// `rd = zx.q(lhs < rhs)`
fn lift_set_less(rd: usize, lhs: Expr, rhs: Expr, signed: bool) -> Vec<Stmt> {
    let cond = if signed {
        Condition::SignedLessThan
    } else {
        Condition::UnsignedLessThan
    };
    vec![set(
        rd,
        Expr::zero_extend(Width::Double, Expr::compare(cond, Width::Double, lhs, rhs)),
    )]
}

/// Effective address `rs1 + imm`.
fn effective_address(inst: &Instruction) -> Expr {
    let base = read(inst.rs1);
    if inst.imm == 0 {
        base
    } else {
        Expr::binary(
            BinaryOp::Add,
            Width::Double,
            base,
            Expr::constant(inst.imm as u64),
        )
    }
}

fn lift_load(inst: &Instruction, width: Width, signed: bool) -> Vec<Stmt> {
    let value = Expr::load(width, effective_address(inst));
    let value = match (width, signed) {
        (Width::Double, _) => value,
        (_, true) => Expr::sign_extend(Width::Double, value),
        (_, false) => Expr::zero_extend(Width::Double, value),
    };
    vec![set(inst.rd, value)]
}

fn lift_store(inst: &Instruction, width: Width) -> Vec<Stmt> {
    vec![Stmt::Store {
        width,
        addr: effective_address(inst),
        value: low(width, inst.rs2),
    }]
}

fn lift_branch(inst: &Instruction, address: u64, next: u64) -> Vec<Stmt> {
    let cond = match inst.mnemonic {
        Mnemonic::Beq => Condition::Equal,
        Mnemonic::Bne => Condition::NotEqual,
        Mnemonic::Blt => Condition::SignedLessThan,
        Mnemonic::Bge => Condition::SignedGreaterEqual,
        Mnemonic::Bltu => Condition::UnsignedLessThan,
        _ => Condition::UnsignedGreaterEqual,
    };
    vec![Stmt::If {
        condition: Expr::compare(cond, Width::Double, read(inst.rs1), read(inst.rs2)),
        on_true: VirtAddr::new(address).offset(inst.imm).val(),
        on_false: next,
    }]
}

/// `(rs1 + imm) & ~1`
fn indirect_target(inst: &Instruction) -> Expr {
    Expr::binary(
        BinaryOp::And,
        Width::Double,
        effective_address(inst),
        Expr::constant(!1),
    )
}

fn lift_jalr(inst: &Instruction, next: u64) -> Vec<Stmt> {
    let target = indirect_target(inst);
    if inst.rd == inst.rs1 {
        vec![
            Stmt::SetTemp {
                temp: JALR_TARGET_TEMP,
                value: target,
            },
            set(inst.rd, Expr::ConstPtr(next)),
            Stmt::Call(Expr::Temp(JALR_TARGET_TEMP)),
        ]
    } else {
        vec![set(inst.rd, Expr::ConstPtr(next)), Stmt::Call(target)]
    }
}
