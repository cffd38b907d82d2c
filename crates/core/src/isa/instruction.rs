//! Instruction encoding and the decoded instruction record.
//!
//! Provides bit extraction for the fixed fields of a 32-bit RISC-V word, the
//! `Format` and `Mnemonic` enumerations, and the `Instruction` value produced
//! by the decoder.

use std::fmt;

use serde::Serialize;

use crate::common::VirtAddr;

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for extracting a register field.
pub const REG_MASK: u32 = 0x1F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;
/// Bit mask for extracting the funct6 field (bits 26-31).
pub const FUNCT6_MASK: u32 = 0x3F;

/// Trait for extracting instruction fields from encoded instructions.
pub trait InstructionBits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;

    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;

    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;

    /// Extracts the second source register field (bits 20-24).
    ///
    /// For immediate shifts this is also the low five bits of the shift amount.
    fn rs2(&self) -> usize;

    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;

    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;

    /// Extracts the funct6 field (bits 26-31), used by 64-bit immediate shifts.
    fn funct6(&self) -> u32;
}

impl InstructionBits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }

    #[inline(always)]
    fn funct6(&self) -> u32 {
        (self >> 26) & FUNCT6_MASK
    }
}

/// Encoding format of a decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    /// Register-register.
    R,
    /// Register-immediate, loads, `jalr`, system.
    I,
    /// Store.
    S,
    /// Conditional branch.
    B,
    /// Upper immediate.
    U,
    /// Jump.
    J,
    /// The word could not be decoded.
    Error,
}

impl Format {
    /// Returns the format letter, or `error`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::R => "R",
            Self::I => "I",
            Self::S => "S",
            Self::B => "B",
            Self::U => "U",
            Self::J => "J",
            Self::Error => "error",
        }
    }
}

macro_rules! mnemonics {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Operation identified by the decoder.
        ///
        /// Covers RV64I, the RV64 word-sized operations and the
        /// pseudo-instructions `j`, `li`, `ret` and `mv`.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "lowercase")]
        #[allow(missing_docs)]
        pub enum Mnemonic {
            $($variant,)*
        }

        impl Mnemonic {
            /// Returns the canonical lowercase name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

mnemonics! {
    Lui => "lui",
    Auipc => "auipc",
    Jal => "jal",
    Jalr => "jalr",
    Beq => "beq",
    Bne => "bne",
    Blt => "blt",
    Bge => "bge",
    Bltu => "bltu",
    Bgeu => "bgeu",
    Lb => "lb",
    Lh => "lh",
    Lw => "lw",
    Ld => "ld",
    Lbu => "lbu",
    Lhu => "lhu",
    Lwu => "lwu",
    Sb => "sb",
    Sh => "sh",
    Sw => "sw",
    Sd => "sd",
    Addi => "addi",
    Slti => "slti",
    Sltiu => "sltiu",
    Xori => "xori",
    Ori => "ori",
    Andi => "andi",
    Slli => "slli",
    Srli => "srli",
    Srai => "srai",
    Add => "add",
    Sub => "sub",
    Sll => "sll",
    Slt => "slt",
    Sltu => "sltu",
    Xor => "xor",
    Srl => "srl",
    Sra => "sra",
    Or => "or",
    And => "and",
    Fence => "fence",
    Ecall => "ecall",
    Ebreak => "ebreak",
    Addiw => "addiw",
    Slliw => "slliw",
    Srliw => "srliw",
    Sraiw => "sraiw",
    Addw => "addw",
    Subw => "subw",
    Sllw => "sllw",
    Srlw => "srlw",
    Sraw => "sraw",
    J => "j",
    Li => "li",
    Ret => "ret",
    Mv => "mv",
    Unsupported => "unsupported",
}

impl Mnemonic {
    /// Returns true for the six conditional branches.
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Self::Beq | Self::Bne | Self::Blt | Self::Bge | Self::Bltu | Self::Bgeu
        )
    }

    /// Returns true for loads.
    pub const fn is_load(self) -> bool {
        matches!(
            self,
            Self::Lb | Self::Lh | Self::Lw | Self::Ld | Self::Lbu | Self::Lhu | Self::Lwu
        )
    }

    /// Returns true for immediate shifts, whose `imm` is a shift amount.
    pub const fn is_shift_immediate(self) -> bool {
        matches!(
            self,
            Self::Slli | Self::Srli | Self::Srai | Self::Slliw | Self::Srliw | Self::Sraiw
        )
    }

    /// Returns true for the pseudo-instructions produced by reclassification.
    pub const fn is_pseudo(self) -> bool {
        matches!(self, Self::J | Self::Li | Self::Ret | Self::Mv)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded instruction.
///
/// Register fields hold 0 when the format does not define them. The
/// immediate is fully sign-extended. For branches and `jal` it is relative
/// to the instruction address; for the `j` pseudo-instruction it already
/// holds the absolute target. Use [`Instruction::target`] to get the
/// absolute destination of any direct transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Instruction {
    /// The raw 32-bit encoding.
    pub raw: u32,
    /// Encoding format.
    pub format: Format,
    /// Resolved operation.
    pub mnemonic: Mnemonic,
    /// Destination register index.
    pub rd: usize,
    /// First source register index.
    pub rs1: usize,
    /// Second source register index.
    pub rs2: usize,
    /// The funct3 field.
    pub funct3: u32,
    /// The funct7 field.
    pub funct7: u32,
    /// Sign-extended immediate (shift amount for immediate shifts).
    pub imm: i64,
}

impl Instruction {
    /// Returns the record for an undecodable word.
    ///
    /// Every field except `raw` takes its zero value.
    pub const fn error(raw: u32) -> Self {
        Self {
            raw,
            format: Format::Error,
            mnemonic: Mnemonic::Unsupported,
            rd: 0,
            rs1: 0,
            rs2: 0,
            funct3: 0,
            funct7: 0,
            imm: 0,
        }
    }

    /// Returns true if the word decoded successfully.
    pub const fn is_valid(&self) -> bool {
        !matches!(self.format, Format::Error)
    }

    /// Returns the absolute target of a direct branch or jump.
    ///
    /// # Arguments
    ///
    /// * `address` - Address the instruction was decoded at.
    ///
    /// # Returns
    ///
    /// `Some(target)` for conditional branches, `jal`, `j` and a `jalr` based
    /// on `x0` (bit 0 cleared); `None` for everything else, including
    /// register-indirect jumps and `ret`.
    pub const fn target(&self, address: u64) -> Option<u64> {
        match self.mnemonic {
            Mnemonic::J => Some(self.imm as u64),
            Mnemonic::Jalr if self.rs1 == 0 => Some(self.imm as u64 & !1),
            Mnemonic::Jal
            | Mnemonic::Beq
            | Mnemonic::Bne
            | Mnemonic::Blt
            | Mnemonic::Bge
            | Mnemonic::Bltu
            | Mnemonic::Bgeu => Some(VirtAddr::new(address).offset(self.imm).val()),
            _ => None,
        }
    }
}
