//! Register-transfer intermediate language.
//!
//! A small expression tree vocabulary in the style of a low-level IL: every
//! expression has an operand width, every statement is one architectural
//! effect. The text form mirrors common LLIL notation (`sx.q(...)`, `[addr].d`,
//! `s<`) so lifted output can be read side by side with a host's own IL view.

use std::fmt;

use serde::Serialize;

use crate::common::Register;

/// Operand width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    /// 1 byte.
    Byte,
    /// 2 bytes.
    Half,
    /// 4 bytes.
    Word,
    /// 8 bytes.
    Double,
}

impl Width {
    /// Width in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
            Self::Double => 8,
        }
    }

    /// Width in bits.
    pub const fn bits(self) -> u32 {
        (self.bytes() * 8) as u32
    }

    /// Mask selecting the low `bits()` bits.
    pub const fn mask(self) -> u64 {
        match self {
            Self::Double => u64::MAX,
            _ => (1u64 << self.bits()) - 1,
        }
    }

    /// LLIL size suffix.
    const fn suffix(self) -> &'static str {
        match self {
            Self::Byte => "b",
            Self::Half => "w",
            Self::Word => "d",
            Self::Double => "q",
        }
    }
}

/// Two-operand arithmetic and logic operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Logical shift left.
    Shl,
    /// Logical shift right.
    LogicalShr,
    /// Arithmetic shift right.
    ArithShr,
}

impl BinaryOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::LogicalShr => "u>>",
            Self::ArithShr => "s>>",
        }
    }
}

/// Comparison predicates. A comparison evaluates to 1 or 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// Signed `<`.
    SignedLessThan,
    /// Signed `>=`.
    SignedGreaterEqual,
    /// Unsigned `<`.
    UnsignedLessThan,
    /// Unsigned `>=`.
    UnsignedGreaterEqual,
}

impl Condition {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::SignedLessThan => "s<",
            Self::SignedGreaterEqual => "s>=",
            Self::UnsignedLessThan => "u<",
            Self::UnsignedGreaterEqual => "u>=",
        }
    }
}

/// Identifier of a lifter-allocated temporary.
pub type TempId = u32;

/// A side-effect-free expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Integer constant of the given width.
    Const {
        /// Constant width.
        width: Width,
        /// Value, truncated to `width` when evaluated.
        value: u64,
    },
    /// Pointer-sized constant that names an address.
    ConstPtr(u64),
    /// Full-width register read.
    Reg(Register),
    /// Temporary read.
    Temp(TempId),
    /// Memory read.
    Load {
        /// Access width.
        width: Width,
        /// Address expression.
        addr: Box<Expr>,
    },
    /// Binary operation computed at `width`.
    Binary {
        /// Operation.
        op: BinaryOp,
        /// Operand and result width.
        width: Width,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Comparison of two `width`-sized operands, yielding 0 or 1.
    Compare {
        /// Predicate.
        cond: Condition,
        /// Operand width.
        width: Width,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Sign extension of the inner expression to `width`.
    SignExtend {
        /// Result width.
        width: Width,
        /// Inner expression.
        expr: Box<Expr>,
    },
    /// Zero extension of the inner expression to `width`.
    ZeroExtend {
        /// Result width.
        width: Width,
        /// Inner expression.
        expr: Box<Expr>,
    },
    /// The low `width` bytes of the inner expression.
    LowPart {
        /// Result width.
        width: Width,
        /// Inner expression.
        expr: Box<Expr>,
    },
}

impl Expr {
    /// Full-width integer constant.
    pub const fn constant(value: u64) -> Self {
        Self::Const {
            width: Width::Double,
            value,
        }
    }

    /// Constant of a specific width.
    pub const fn constant_sized(width: Width, value: u64) -> Self {
        Self::Const { width, value }
    }

    /// Memory read of `width` bytes at `addr`.
    pub fn load(width: Width, addr: Self) -> Self {
        Self::Load {
            width,
            addr: Box::new(addr),
        }
    }

    /// Binary operation at `width`.
    pub fn binary(op: BinaryOp, width: Width, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            op,
            width,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Comparison of `width`-sized operands.
    pub fn compare(cond: Condition, width: Width, lhs: Self, rhs: Self) -> Self {
        Self::Compare {
            cond,
            width,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Sign extension to `width`.
    pub fn sign_extend(width: Width, expr: Self) -> Self {
        Self::SignExtend {
            width,
            expr: Box::new(expr),
        }
    }

    /// Zero extension to `width`.
    pub fn zero_extend(width: Width, expr: Self) -> Self {
        Self::ZeroExtend {
            width,
            expr: Box::new(expr),
        }
    }

    /// Low `width` bytes of `expr`.
    pub fn low_part(width: Width, expr: Self) -> Self {
        Self::LowPart {
            width,
            expr: Box::new(expr),
        }
    }

    /// Width of the value this expression produces.
    pub const fn width(&self) -> Width {
        match self {
            Self::Const { width, .. }
            | Self::Load { width, .. }
            | Self::Binary { width, .. }
            | Self::SignExtend { width, .. }
            | Self::ZeroExtend { width, .. }
            | Self::LowPart { width, .. } => *width,
            Self::Compare { .. } => Width::Byte,
            Self::ConstPtr(_) | Self::Reg(_) | Self::Temp(_) => Width::Double,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const { value, .. } => write!(f, "{value:#x}"),
            Self::ConstPtr(value) => write!(f, "{value:#x}"),
            Self::Reg(reg) => write!(f, "{reg}"),
            Self::Temp(id) => write!(f, "temp{id}"),
            Self::Load { width, addr } => write!(f, "[{addr}].{}", width.suffix()),
            Self::Binary { op, lhs, rhs, .. } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::Compare { cond, lhs, rhs, .. } => {
                write!(f, "({lhs} {} {rhs})", cond.symbol())
            }
            Self::SignExtend { width, expr } => write!(f, "sx.{}({expr})", width.suffix()),
            Self::ZeroExtend { width, expr } => write!(f, "zx.{}({expr})", width.suffix()),
            Self::LowPart { width, expr } => write!(f, "{expr}.{}", width.suffix()),
        }
    }
}

/// A single architectural effect.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// Register write. Writes narrower than the register sign-extend to full width.
    SetReg {
        /// Write width.
        width: Width,
        /// Destination.
        reg: Register,
        /// Value.
        value: Expr,
    },
    /// Temporary write.
    SetTemp {
        /// Destination temporary.
        temp: TempId,
        /// Value.
        value: Expr,
    },
    /// Memory write of `width` bytes.
    Store {
        /// Access width.
        width: Width,
        /// Address expression.
        addr: Expr,
        /// Value, already narrowed to `width`.
        value: Expr,
    },
    /// Two-way conditional transfer.
    If {
        /// Branch condition.
        condition: Expr,
        /// Destination when the condition holds.
        on_true: u64,
        /// Destination otherwise.
        on_false: u64,
    },
    /// Unconditional transfer.
    Jump(Expr),
    /// Subroutine call.
    Call(Expr),
    /// Subroutine return.
    Return(Expr),
    /// Environment call.
    Syscall,
    /// Debugger breakpoint.
    Breakpoint,
    /// Memory ordering barrier.
    Fence,
    /// No effect.
    Nop,
    /// Semantics not modeled.
    Unimplemented,
}

impl Stmt {
    /// Returns true if this statement ends straight-line execution.
    pub const fn is_terminator(&self) -> bool {
        matches!(
            self,
            Self::If { .. } | Self::Jump(_) | Self::Call(_) | Self::Return(_)
        )
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetReg {
                width: Width::Double,
                reg,
                value,
            } => write!(f, "{reg} = {value}"),
            Self::SetReg { width, reg, value } => write!(f, "{reg}.{} = {value}", width.suffix()),
            Self::SetTemp { temp, value } => write!(f, "temp{temp} = {value}"),
            Self::Store { width, addr, value } => {
                write!(f, "[{addr}].{} = {value}", width.suffix())
            }
            Self::If {
                condition,
                on_true,
                on_false,
            } => write!(f, "if {condition} then {on_true:#x} else {on_false:#x}"),
            Self::Jump(target) => write!(f, "jump({target})"),
            Self::Call(target) => write!(f, "call({target})"),
            Self::Return(target) => write!(f, "<return> jump({target})"),
            Self::Syscall => f.write_str("syscall"),
            Self::Breakpoint => f.write_str("breakpoint"),
            Self::Fence => f.write_str("fence"),
            Self::Nop => f.write_str("nop"),
            Self::Unimplemented => f.write_str("unimplemented"),
        }
    }
}
