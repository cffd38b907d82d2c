//! Instruction Text Renderer.
//!
//! Converts a decoded [`Instruction`] into a list of typed text tokens the way an
//! analysis host displays it, and into a plain string for logs and the CLI.
//!
//! # Layout
//!
//! The mnemonic is padded to six columns and followed by one space. Operands follow
//! the assembler conventions of each format:
//!
//! - R: `rd, rs1, rs2`
//! - I: `rd, rs1, imm` (shifts print the shift amount), loads and `jalr` print
//!   `rd, imm(rs1)`, `li` prints `rd, imm`, `mv` prints `rd, rs1`
//! - S: `rs2, imm(rs1)`
//! - B: `rs1, rs2, target`
//! - U: `rd, imm[31:12]`
//! - J: `rd, target` (`j` omits `rd`)
//!
//! # Usage
//!
//! ```
//! use rvlift_core::isa::{decode::decode, disasm::disassemble};
//! let text = disassemble(&decode(0x00A0_0513, 0), 0); // addi x10, x0, 10
//! assert_eq!(text, "li     a0, 10");
//! ```

use std::fmt;

use serde::Serialize;

use crate::common::constants::MNEMONIC_PADDING;
use crate::common::reg::register_name;
use crate::isa::instruction::{Format, Instruction, Mnemonic};

/// Category of a rendered token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// The mnemonic.
    Instruction,
    /// Plain text, including padding.
    Text,
    /// A register name.
    Register,
    /// `", "` between operands.
    OperandSeparator,
    /// An integer operand.
    Integer,
    /// An address relative to the current instruction.
    CodeRelativeAddress,
    /// An absolute value that is likely an address.
    PossibleAddress,
    /// Opening bracket of a memory operand.
    BeginMemoryOperand,
    /// Closing bracket of a memory operand.
    EndMemoryOperand,
}

/// A single rendered token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Display text.
    pub text: String,
    /// Numeric value for integer and address tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u64>,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            value: None,
        }
    }

    fn with_value(kind: TokenKind, text: impl Into<String>, value: u64) -> Self {
        Self {
            kind,
            text: text.into(),
            value: Some(value),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An operand awaiting rendering.
#[derive(Clone, Copy, Debug)]
enum Operand {
    /// Register number.
    Reg(usize),
    /// Signed decimal integer.
    Int(i64),
    /// Unsigned hexadecimal integer.
    Hex(u64),
    /// Absolute branch or jump target.
    Target(u64),
    /// `offset(base)` memory operand.
    Mem(i64, usize),
}

/// Returns the mnemonic token followed by padding to six columns and one space.
fn mnemonic_tokens(mnemonic: Mnemonic) -> Vec<Token> {
    let name = mnemonic.name();
    let pad = MNEMONIC_PADDING.saturating_sub(name.len());
    vec![
        Token::new(TokenKind::Instruction, name),
        Token::new(TokenKind::Text, " ".repeat(pad)),
        Token::new(TokenKind::Text, " "),
    ]
}

fn push_operand(tokens: &mut Vec<Token>, operand: Operand) {
    match operand {
        Operand::Reg(idx) => tokens.push(Token::new(TokenKind::Register, register_name(idx))),
        Operand::Int(value) => tokens.push(Token::with_value(
            TokenKind::Integer,
            value.to_string(),
            value as u64,
        )),
        Operand::Hex(value) => tokens.push(Token::with_value(
            TokenKind::Integer,
            format!("{value:#x}"),
            value,
        )),
        Operand::Target(target) => tokens.push(Token::with_value(
            TokenKind::PossibleAddress,
            format!("{target:#x}"),
            target,
        )),
        Operand::Mem(offset, base) => {
            tokens.push(Token::with_value(
                TokenKind::CodeRelativeAddress,
                offset.to_string(),
                offset as u64,
            ));
            tokens.push(Token::new(TokenKind::BeginMemoryOperand, "("));
            tokens.push(Token::new(TokenKind::Register, register_name(base)));
            tokens.push(Token::new(TokenKind::EndMemoryOperand, ")"));
        }
    }
}

/// Lists the operands of an instruction in assembler order.
fn operands(inst: &Instruction, address: u64) -> Vec<Operand> {
    use Operand::{Hex, Int, Mem, Reg, Target};

    let target = inst.target(address).unwrap_or_default();
    match (inst.format, inst.mnemonic) {
        (Format::Error, _)
        | (_, Mnemonic::Ret | Mnemonic::Ecall | Mnemonic::Ebreak | Mnemonic::Fence) => vec![],
        (Format::R, _) => vec![Reg(inst.rd), Reg(inst.rs1), Reg(inst.rs2)],
        (Format::I, Mnemonic::Li) => vec![Reg(inst.rd), Int(inst.imm)],
        (Format::I, Mnemonic::Mv) => vec![Reg(inst.rd), Reg(inst.rs1)],
        (Format::I, m) if m.is_load() || m == Mnemonic::Jalr => {
            vec![Reg(inst.rd), Mem(inst.imm, inst.rs1)]
        }
        (Format::I, _) => vec![Reg(inst.rd), Reg(inst.rs1), Int(inst.imm)],
        (Format::S, _) => vec![Reg(inst.rs2), Mem(inst.imm, inst.rs1)],
        (Format::B, _) => vec![Reg(inst.rs1), Reg(inst.rs2), Target(target)],
        (Format::U, _) => vec![Reg(inst.rd), Hex((inst.imm as u64 >> 12) & 0xF_FFFF)],
        (Format::J, Mnemonic::J) => vec![Target(target)],
        (Format::J, _) => vec![Reg(inst.rd), Target(target)],
    }
}

/// Renders an instruction as typed tokens.
///
/// # Arguments
///
/// * `inst` - The decoded instruction.
/// * `address` - Address it was decoded at, used to resolve branch targets.
///
/// # Returns
///
/// The mnemonic, its padding, and the operand tokens separated by `", "`. An
/// undecodable record renders as the bare `unsupported` mnemonic.
pub fn render(inst: &Instruction, address: u64) -> Vec<Token> {
    let mut tokens = mnemonic_tokens(inst.mnemonic);
    for (i, operand) in operands(inst, address).into_iter().enumerate() {
        if i > 0 {
            tokens.push(Token::new(TokenKind::OperandSeparator, ", "));
        }
        push_operand(&mut tokens, operand);
    }
    tokens
}

/// Renders an instruction as a single line of text.
///
/// Trailing padding is trimmed for operand-less instructions.
pub fn disassemble(inst: &Instruction, address: u64) -> String {
    let out: String = render(inst, address)
        .iter()
        .map(|token| token.text.as_str())
        .collect();
    out.trim_end().to_string()
}
