//! # Lifter Properties
//!
//! Generated words drawn from every supported major opcode, checked against
//! rules that hold for any decodable instruction:
//!
//! - Lifting yields at least one statement and never `unimplemented`.
//! - Nothing is ever written to `x0`.
//! - Every conditional branch has exactly a taken and a fall-through edge.

#![allow(unused_results)]

use proptest::prelude::*;

use rvlift_core::common::Register;
use rvlift_core::isa::rv64i::opcodes::{
    EBREAK, ECALL, OP_AUIPC, OP_BRANCH, OP_IMM, OP_IMM_32, OP_JAL, OP_JALR, OP_LOAD, OP_LUI,
    OP_MISC_MEM, OP_REG, OP_REG_32, OP_STORE, OP_SYSTEM,
};
use rvlift_core::isa::{Instruction, decode};
use rvlift_core::lift::{Branch, BranchKind, Stmt, branches, lift};

const OPCODES: [u32; 13] = [
    OP_LUI, OP_AUIPC, OP_JAL, OP_JALR, OP_BRANCH, OP_LOAD, OP_STORE, OP_IMM, OP_IMM_32, OP_REG,
    OP_REG_32, OP_MISC_MEM, OP_SYSTEM,
];

/// Mask clearing the `rd` field (bits 11-7).
const RD_CLEAR: u32 = !(0x1F << 7);

/// Words under a supported opcode. Opcodes keyed on funct7 get one of the
/// two accepted funct7 values so most of them decode.
fn supported_word() -> impl Strategy<Value = u32> {
    let generated = (
        prop::sample::select(OPCODES.to_vec()),
        any::<u32>(),
        prop::sample::select(vec![0u32, 0x20]),
    )
        .prop_map(|(opcode, bits, funct7)| {
            let word = (bits & !0x7F) | opcode;
            match opcode {
                OP_REG | OP_REG_32 | OP_IMM_32 => (word & 0x01FF_FFFF) | (funct7 << 25),
                _ => word,
            }
        });
    prop_oneof![8 => generated, 1 => Just(ECALL), 1 => Just(EBREAK)]
}

fn decoded(word: u32, address: u64) -> Option<Instruction> {
    let inst = decode(word, address);
    inst.is_valid().then_some(inst)
}

fn writes_zero(stmts: &[Stmt]) -> bool {
    stmts.iter().any(|s| {
        matches!(
            s,
            Stmt::SetReg {
                reg: Register::Zero,
                ..
            }
        )
    })
}

proptest! {
    #[test]
    fn decodable_words_lift_to_implemented_statements(
        word in supported_word(),
        address in any::<u64>(),
    ) {
        let Some(inst) = decoded(word, address) else {
            return Ok(());
        };
        let stmts = lift(&inst, address);
        prop_assert!(!stmts.is_empty(), "{word:#010x}");
        prop_assert!(!stmts.contains(&Stmt::Unimplemented), "{word:#010x}");
    }

    #[test]
    fn zero_register_is_never_written(word in supported_word(), address in any::<u64>()) {
        let Some(inst) = decoded(word, address) else {
            return Ok(());
        };
        prop_assert!(!writes_zero(&lift(&inst, address)), "{word:#010x}");
    }

    #[test]
    fn zero_destination_is_never_written(word in supported_word(), address in any::<u64>()) {
        let word = word & RD_CLEAR;
        let Some(inst) = decoded(word, address) else {
            return Ok(());
        };
        let stmts = lift(&inst, address);
        prop_assert!(!stmts.is_empty(), "{word:#010x}");
        prop_assert!(!writes_zero(&stmts), "{word:#010x}");
    }

    #[test]
    fn conditional_branches_have_taken_and_fallthrough_edges(
        bits in any::<u32>(),
        address in any::<u64>(),
    ) {
        let word = (bits & !0x7F) | OP_BRANCH;
        let Some(inst) = decoded(word, address) else {
            return Ok(());
        };
        prop_assert!(inst.mnemonic.is_branch());
        prop_assert_eq!(
            branches(&inst, address),
            vec![
                Branch {
                    kind: BranchKind::TrueBranch,
                    target: Some(address.wrapping_add_signed(inst.imm)),
                },
                Branch {
                    kind: BranchKind::FalseBranch,
                    target: Some(address.wrapping_add(4)),
                },
            ]
        );
    }
}
