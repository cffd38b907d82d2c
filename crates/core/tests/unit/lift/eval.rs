//! # IL Evaluation Tests
//!
//! Runs lifted statements on a concrete `Machine` and compares the resulting
//! state with the architectural result of each instruction.

#![allow(unused_results)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use rvlift_core::common::Register;
use rvlift_core::isa::decode;
use rvlift_core::lift::eval::{Flow, Machine};
use rvlift_core::lift::{Expr, Stmt, Width};

use crate::common::builder::InstructionBuilder;

const fn build() -> InstructionBuilder {
    InstructionBuilder::new()
}

fn run(m: &mut Machine, word: u32, address: u64) -> Flow {
    m.step(&decode(word, address), address)
}

fn machine_with(regs: &[(Register, u64)]) -> Machine {
    let mut m = Machine::new();
    for &(reg, value) in regs {
        m.set_reg(reg, value);
    }
    m
}

// ══════════════════════════════════════════════════════════
// 1. Register file
// ══════════════════════════════════════════════════════════

#[test]
fn zero_register_ignores_writes() {
    let mut m = machine_with(&[(Register::Ra, 5), (Register::Sp, 7)]);
    assert_eq!(run(&mut m, build().add(0, 1, 2).build(), 0), Flow::Next);
    assert_eq!(m.reg(Register::Zero), 0);

    m.set_reg(Register::Zero, 99);
    assert_eq!(m.reg(Register::Zero), 0);
}

#[test]
fn step_advances_pc() {
    let mut m = Machine::default();
    assert_eq!(run(&mut m, 0x02A0_0293, 0x400), Flow::Next);
    assert_eq!(m.reg(Register::T0), 42);
    assert_eq!(m.pc(), 0x404);
}

#[test]
fn lui_sign_extends() {
    let mut m = Machine::new();
    let _ = run(&mut m, build().lui(5, 0xFFFFF).build(), 0);
    assert_eq!(m.reg(Register::T0), 0xFFFF_FFFF_FFFF_F000);
}

// ══════════════════════════════════════════════════════════
// 2. Word operations
// ══════════════════════════════════════════════════════════

#[test]
fn addw_overflow_sign_extends() {
    let mut m = machine_with(&[(Register::A1, 0x7FFF_FFFF), (Register::A2, 1)]);
    let _ = run(&mut m, build().addw(10, 11, 12).build(), 0);
    assert_eq!(m.reg(Register::A0), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn addiw_ignores_upper_source_bits() {
    let mut m = machine_with(&[(Register::A0, 0xDEAD_0000_0000_0001)]);
    let _ = run(&mut m, build().addiw(10, 10, -1).build(), 0);
    assert_eq!(m.reg(Register::A0), 0);
}

#[test]
fn sraw_and_sraiw_shift_in_sign() {
    let mut m = machine_with(&[(Register::T1, 0x8000_0000), (Register::T2, 4)]);
    let _ = run(&mut m, build().sraw(5, 6, 7).build(), 0);
    assert_eq!(m.reg(Register::T0), 0xFFFF_FFFF_F800_0000);

    let _ = run(&mut m, build().sraiw(5, 6, 4).build(), 0);
    assert_eq!(m.reg(Register::T0), 0xFFFF_FFFF_F800_0000);
}

#[test]
fn sllw_masks_amount_to_five_bits() {
    let mut m = machine_with(&[(Register::T1, 1), (Register::T2, 33)]);
    let _ = run(&mut m, build().sllw(5, 6, 7).build(), 0);
    assert_eq!(m.reg(Register::T0), 2);
}

#[test]
fn srai_full_width() {
    let mut m = machine_with(&[(Register::T1, 1 << 63)]);
    let _ = run(&mut m, build().srai(5, 6, 63).build(), 0);
    assert_eq!(m.reg(Register::T0), u64::MAX);
}

#[test]
fn signed_and_unsigned_compare() {
    let mut m = machine_with(&[(Register::T1, u64::MAX), (Register::T2, 1)]);
    let _ = run(&mut m, build().slt(5, 6, 7).build(), 0);
    assert_eq!(m.reg(Register::T0), 1);
    let _ = run(&mut m, build().sltu(5, 6, 7).build(), 0);
    assert_eq!(m.reg(Register::T0), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Memory
// ══════════════════════════════════════════════════════════

#[test]
fn sb_from_zero_register_stores_zero() {
    let mut m = machine_with(&[(Register::Gp, 0x100)]);
    m.write_mem(0x104, Width::Byte, 0xFF);

    // sb x0, 4(x3)
    let _ = run(&mut m, build().sb(3, 0, 4).build(), 0);
    assert_eq!(m.read_mem(0x104, Width::Byte), 0);
}

#[test]
fn sd_then_ld_round_trips() {
    let mut m = machine_with(&[(Register::Sp, 0x8000), (Register::S0, 0x1122_3344_5566_7788)]);
    let _ = run(&mut m, build().sd(2, 8, -16).build(), 0);
    assert_eq!(m.read_mem(0x7FF0, Width::Byte), 0x88);

    let _ = run(&mut m, build().ld(10, 2, -16).build(), 4);
    assert_eq!(m.reg(Register::A0), 0x1122_3344_5566_7788);
}

#[test]
fn narrow_loads_extend_by_signedness() {
    let mut m = machine_with(&[(Register::Sp, 0x200)]);
    m.write_mem(0x200, Width::Word, 0x8000_0080);

    let _ = run(&mut m, build().lb(10, 2, 0).build(), 0);
    assert_eq!(m.reg(Register::A0), 0xFFFF_FFFF_FFFF_FF80);
    let _ = run(&mut m, build().lbu(10, 2, 0).build(), 0);
    assert_eq!(m.reg(Register::A0), 0x80);
    let _ = run(&mut m, build().lw(10, 2, 0).build(), 0);
    assert_eq!(m.reg(Register::A0), 0xFFFF_FFFF_8000_0080);
    let _ = run(&mut m, build().lwu(10, 2, 0).build(), 0);
    assert_eq!(m.reg(Register::A0), 0x8000_0080);
}

// ══════════════════════════════════════════════════════════
// 4. Control flow
// ══════════════════════════════════════════════════════════

#[test]
fn beq_selects_edge() {
    let word = build().beq(1, 2, 8).build();

    let mut m = machine_with(&[(Register::Ra, 3), (Register::Sp, 3)]);
    assert_eq!(run(&mut m, word, 0x1000), Flow::Jump(0x1008));
    assert_eq!(m.pc(), 0x1008);

    let mut m = machine_with(&[(Register::Ra, 3), (Register::Sp, 4)]);
    assert_eq!(run(&mut m, word, 0x1000), Flow::Jump(0x1004));
    assert_eq!(m.pc(), 0x1004);
}

#[test]
fn jal_links_and_calls() {
    let mut m = Machine::new();
    assert_eq!(run(&mut m, build().jal(1, 0x40).build(), 0x1000), Flow::Call(0x1040));
    assert_eq!(m.reg(Register::Ra), 0x1004);
    assert_eq!(m.pc(), 0x1040);
}

#[test]
fn jalr_reads_base_before_linking() {
    let mut m = machine_with(&[(Register::Ra, 0x2001)]);
    assert_eq!(run(&mut m, build().jalr(1, 1, 0).build(), 0x1000), Flow::Call(0x2000));
    assert_eq!(m.reg(Register::Ra), 0x1004);
}

#[test]
fn ret_returns_to_link() {
    let mut m = machine_with(&[(Register::Ra, 0x3000)]);
    assert_eq!(run(&mut m, build().jalr(0, 1, 0).build(), 0x1000), Flow::Return(0x3000));
}

#[test]
fn traps_fall_through_pc() {
    let mut m = Machine::new();
    assert_eq!(run(&mut m, build().ecall().build(), 0x10), Flow::Syscall);
    assert_eq!(m.pc(), 0x14);
    assert_eq!(run(&mut m, build().ebreak().build(), 0x14), Flow::Breakpoint);
    assert_eq!(run(&mut m, 0xFFFF_FFFF, 0x18), Flow::Unimplemented);
}

#[test]
fn execute_stops_at_first_terminator() {
    let mut m = Machine::new();
    let stmts = [
        Stmt::Jump(Expr::ConstPtr(0x40)),
        Stmt::SetReg {
            width: Width::Double,
            reg: Register::A0,
            value: Expr::constant(1),
        },
    ];
    assert_eq!(m.execute(&stmts), Flow::Jump(0x40));
    assert_eq!(m.reg(Register::A0), 0);
}

// ══════════════════════════════════════════════════════════
// 5. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn add_and_sub_match_wrapping_arithmetic(a in any::<u64>(), b in any::<u64>()) {
        let mut m = machine_with(&[(Register::A1, a), (Register::A2, b)]);
        let _ = run(&mut m, build().add(10, 11, 12).build(), 0);
        prop_assert_eq!(m.reg(Register::A0), a.wrapping_add(b));
        let _ = run(&mut m, build().sub(10, 11, 12).build(), 0);
        prop_assert_eq!(m.reg(Register::A0), a.wrapping_sub(b));
    }

    #[test]
    fn word_ops_match_i32_arithmetic(a in any::<u64>(), b in any::<u64>()) {
        let mut m = machine_with(&[(Register::A1, a), (Register::A2, b)]);
        let _ = run(&mut m, build().addw(10, 11, 12).build(), 0);
        let expected = (a as i32).wrapping_add(b as i32) as i64 as u64;
        prop_assert_eq!(m.reg(Register::A0), expected);

        let _ = run(&mut m, build().subw(10, 11, 12).build(), 0);
        let expected = (a as i32).wrapping_sub(b as i32) as i64 as u64;
        prop_assert_eq!(m.reg(Register::A0), expected);
    }

    #[test]
    fn xori_matches_xor(a in any::<u64>(), imm in -2048i32..2048) {
        let mut m = machine_with(&[(Register::A1, a)]);
        let _ = run(&mut m, build().xori(10, 11, imm).build(), 0);
        prop_assert_eq!(m.reg(Register::A0), a ^ (i64::from(imm) as u64));
    }
}
