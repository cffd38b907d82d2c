//! # Lifter Tests
//!
//! Checks the statement shapes produced for each instruction class and the
//! text form a host displays.

use pretty_assertions::assert_eq;
use rstest::rstest;

use rvlift_core::common::Register;
use rvlift_core::isa::{Instruction, decode};
use rvlift_core::lift::{BinaryOp, Condition, Expr, Stmt, Width, lift};

use crate::common::builder::InstructionBuilder;

const fn build() -> InstructionBuilder {
    InstructionBuilder::new()
}

fn lift_word(word: u32, address: u64) -> Vec<Stmt> {
    lift(&decode(word, address), address)
}

fn lift_text(word: u32, address: u64) -> Vec<String> {
    lift_word(word, address)
        .iter()
        .map(ToString::to_string)
        .collect()
}

// ══════════════════════════════════════════════════════════
// 1. Zero register
// ══════════════════════════════════════════════════════════

#[test]
fn write_to_zero_register_is_nop() {
    assert_eq!(lift_word(build().add(0, 1, 2).build(), 0), vec![Stmt::Nop]);
    assert_eq!(lift_word(0x0000_0013, 0), vec![Stmt::Nop]);
}

#[rstest]
#[case::ld(build().ld(0, 2, 8).build())]
#[case::lbu(build().lbu(0, 2, 0).build())]
#[case::lw(build().lw(0, 10, -4).build())]
#[case::addw(build().addw(0, 1, 2).build())]
#[case::addiw(build().addiw(0, 1, 5).build())]
#[case::slli(build().slli(0, 1, 3).build())]
#[case::sraiw(build().sraiw(0, 1, 3).build())]
#[case::sllw(build().sllw(0, 1, 2).build())]
#[case::sltu(build().sltu(0, 1, 2).build())]
#[case::lui(build().lui(0, 0x12345).build())]
#[case::auipc(build().auipc(0, 0x1).build())]
fn result_written_to_zero_register_is_dropped(#[case] word: u32) {
    assert_eq!(lift_word(word, 0x1000), vec![Stmt::Nop]);
}

#[test]
fn read_of_zero_register_is_constant() {
    let stmts = lift_word(build().add(5, 0, 6).build(), 0);
    assert_eq!(
        stmts,
        vec![Stmt::SetReg {
            width: Width::Double,
            reg: Register::T0,
            value: Expr::binary(
                BinaryOp::Add,
                Width::Double,
                Expr::constant(0),
                Expr::Reg(Register::T1),
            ),
        }]
    );
}

#[test]
fn store_of_zero_register_writes_zero() {
    // sb x0, 4(x3)
    let stmts = lift_word(build().sb(3, 0, 4).build(), 0);
    assert_eq!(
        stmts,
        vec![Stmt::Store {
            width: Width::Byte,
            addr: Expr::binary(
                BinaryOp::Add,
                Width::Double,
                Expr::Reg(Register::Gp),
                Expr::constant(4),
            ),
            value: Expr::constant_sized(Width::Byte, 0),
        }]
    );
}

// ══════════════════════════════════════════════════════════
// 2. Arithmetic and loads
// ══════════════════════════════════════════════════════════

#[test]
fn li_sets_pointer_sized_constant() {
    assert_eq!(lift_text(0x02A0_0293, 0), vec!["t0 = 0x2a"]);
    assert_eq!(
        lift_word(build().addi(10, 0, -1).build(), 0),
        vec![Stmt::SetReg {
            width: Width::Double,
            reg: Register::A0,
            value: Expr::ConstPtr(u64::MAX),
        }]
    );
}

#[test]
fn mv_copies_register() {
    assert_eq!(lift_text(build().addi(10, 11, 0).build(), 0), vec!["a0 = a1"]);
}

#[test]
fn auipc_is_pc_relative_pointer() {
    assert_eq!(
        lift_word(build().auipc(3, 0x2).build(), 0x1000),
        vec![Stmt::SetReg {
            width: Width::Double,
            reg: Register::Gp,
            value: Expr::ConstPtr(0x3000),
        }]
    );
}

#[test]
fn word_ops_write_at_word_width() {
    assert_eq!(
        lift_text(build().addw(10, 11, 12).build(), 0),
        vec!["a0.d = (a1.d + a2.d)"]
    );
    assert_eq!(
        lift_text(build().addiw(10, 10, -1).build(), 0),
        vec!["a0.d = (a0.d + 0xffffffff)"]
    );
}

#[test]
fn register_shift_masks_amount() {
    assert_eq!(
        lift_text(build().sra(5, 6, 7).build(), 0),
        vec!["t0 = (t1 s>> (t2 & 0x3f))"]
    );
    assert_eq!(
        lift_text(build().sllw(5, 6, 7).build(), 0),
        vec!["t0.d = (t1.d << (t2.d & 0x1f))"]
    );
}

#[test]
fn set_less_than_zero_extends_comparison() {
    assert_eq!(
        lift_text(build().slt(5, 6, 7).build(), 0),
        vec!["t0 = zx.q((t1 s< t2))"]
    );
    assert_eq!(
        lift_text(build().sltiu(5, 6, 1).build(), 0),
        vec!["t0 = zx.q((t1 u< 0x1))"]
    );
}

#[test]
fn loads_extend_to_full_width() {
    assert_eq!(
        lift_text(build().lb(10, 2, 8).build(), 0),
        vec!["a0 = sx.q([(sp + 0x8)].b)"]
    );
    assert_eq!(
        lift_text(build().lwu(10, 2, 0).build(), 0),
        vec!["a0 = zx.q([sp].d)"]
    );
    assert_eq!(lift_text(build().ld(10, 2, 0).build(), 0), vec!["a0 = [sp].q"]);
}

#[test]
fn store_narrows_source() {
    assert_eq!(
        lift_text(build().sw(2, 10, 12).build(), 0),
        vec!["[(sp + 0xc)].d = a0.d"]
    );
}

// ══════════════════════════════════════════════════════════
// 3. Control flow
// ══════════════════════════════════════════════════════════

#[test]
fn branch_is_two_way_if() {
    let stmts = lift_word(build().beq(1, 2, 8).build(), 0x1000);
    assert_eq!(
        stmts,
        vec![Stmt::If {
            condition: Expr::compare(
                Condition::Equal,
                Width::Double,
                Expr::Reg(Register::Ra),
                Expr::Reg(Register::Sp),
            ),
            on_true: 0x1008,
            on_false: 0x1004,
        }]
    );
    assert!(stmts[0].is_terminator());
}

#[test]
fn j_is_jump_to_absolute_target() {
    assert_eq!(
        lift_word(build().jal(0, 100).build(), 0x2000),
        vec![Stmt::Jump(Expr::ConstPtr(0x2064))]
    );
}

#[test]
fn jal_links_then_calls() {
    assert_eq!(
        lift_text(build().jal(1, 0x40).build(), 0x1000),
        vec!["ra = 0x1004", "call(0x1040)"]
    );
}

#[test]
fn ret_returns_through_cleared_target() {
    assert_eq!(
        lift_text(build().jalr(0, 1, 0).build(), 0),
        vec!["<return> jump((ra & 0xfffffffffffffffe))"]
    );
}

#[test]
fn jalr_stages_target_when_link_clobbers_base() {
    let stmts = lift_word(build().jalr(1, 1, 0).build(), 0x1000);
    assert_eq!(stmts.len(), 3);
    assert!(matches!(stmts[0], Stmt::SetTemp { temp: 0, .. }));
    assert_eq!(stmts[2], Stmt::Call(Expr::Temp(0)));
}

#[test]
fn jalr_to_other_register_calls_directly() {
    assert_eq!(
        lift_text(build().jalr(1, 5, 8).build(), 0x1000),
        vec!["ra = 0x1004", "call(((t0 + 0x8) & 0xfffffffffffffffe))"]
    );
}

// ══════════════════════════════════════════════════════════
// 4. System and undecodable
// ══════════════════════════════════════════════════════════

#[test]
fn system_instructions() {
    assert_eq!(lift_word(build().ecall().build(), 0), vec![Stmt::Syscall]);
    assert_eq!(lift_word(build().ebreak().build(), 0), vec![Stmt::Breakpoint]);
    assert_eq!(lift_word(build().fence().build(), 0), vec![Stmt::Fence]);
}

#[test]
fn error_record_is_unimplemented() {
    assert_eq!(
        lift(&Instruction::error(0xFFFF_FFFF), 0),
        vec![Stmt::Unimplemented]
    );
}

#[test]
fn every_decodable_word_lifts_to_something() {
    let words = [
        build().add(1, 2, 3).build(),
        build().lui(5, 1).build(),
        build().sd(2, 1, 0).build(),
        build().bltu(1, 2, -4).build(),
        build().jal(1, 8).build(),
    ];
    for word in words {
        assert!(!lift_word(word, 0x8000).is_empty(), "{word:#010x}");
    }
}
