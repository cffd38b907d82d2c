//! Reference Evaluator.
//!
//! Executes lifted statements against a concrete machine state so the IL can be
//! checked against the architectural behaviour of each instruction. It provides:
//! 1. **State:** A 33-entry register file (x0 hard-wired to zero, plus `pc`), lifter
//!    temporaries and a sparse little-endian byte memory.
//! 2. **Expression Semantics:** Width-aware arithmetic, comparisons and extensions.
//! 3. **Control Flow:** The `Flow` outcome of a statement list.

use std::collections::BTreeMap;

use crate::common::constants::REGISTER_COUNT;
use crate::common::{INSTRUCTION_SIZE, Register, VirtAddr};
use crate::isa::instruction::Instruction;
use crate::lift::il::{BinaryOp, Condition, Expr, Stmt, TempId, Width};

/// How execution continues after a statement list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Fall through to the next instruction.
    Next,
    /// Transfer to an address (jumps and resolved conditional branches).
    Jump(u64),
    /// Call to an address.
    Call(u64),
    /// Return to an address.
    Return(u64),
    /// Environment call raised.
    Syscall,
    /// Breakpoint raised.
    Breakpoint,
    /// Hit a statement with no modeled semantics.
    Unimplemented,
}

/// Concrete machine state.
#[derive(Clone, Debug)]
pub struct Machine {
    regs: [u64; REGISTER_COUNT],
    temps: BTreeMap<TempId, u64>,
    memory: BTreeMap<u64, u8>,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign extends the low `width` bits of `value` to 64 bits.
const fn sign_extend(value: u64, width: Width) -> i64 {
    let shift = 64 - width.bits();
    ((value << shift) as i64) >> shift
}

impl Machine {
    /// Creates a machine with every register and memory byte zero.
    pub fn new() -> Self {
        Self {
            regs: [0; REGISTER_COUNT],
            temps: BTreeMap::new(),
            memory: BTreeMap::new(),
        }
    }

    /// Reads a register. `zero` always reads 0.
    pub const fn reg(&self, reg: Register) -> u64 {
        if reg.is_zero() {
            0
        } else {
            self.regs[reg.index()]
        }
    }

    /// Writes a full-width register value. Writes to `zero` are ignored.
    pub const fn set_reg(&mut self, reg: Register, value: u64) {
        if !reg.is_zero() {
            self.regs[reg.index()] = value;
        }
    }

    /// Returns the program counter.
    pub const fn pc(&self) -> u64 {
        self.reg(Register::Pc)
    }

    /// Reads `width` bytes little-endian; unwritten bytes read as zero.
    pub fn read_mem(&self, addr: u64, width: Width) -> u64 {
        (0..width.bytes()).rev().fold(0u64, |acc, i| {
            let byte = self
                .memory
                .get(&VirtAddr::new(addr).advance(i as u64).val())
                .copied()
                .unwrap_or(0);
            (acc << 8) | u64::from(byte)
        })
    }

    /// Writes the low `width` bytes of `value` little-endian.
    pub fn write_mem(&mut self, addr: u64, width: Width, value: u64) {
        for i in 0..width.bytes() {
            let byte = (value >> (i * 8)) as u8;
            let _ = self
                .memory
                .insert(VirtAddr::new(addr).advance(i as u64).val(), byte);
        }
    }

    /// Evaluates an expression to its value, truncated to the expression width.
    pub fn eval(&self, expr: &Expr) -> u64 {
        match expr {
            Expr::Const { width, value } => value & width.mask(),
            Expr::ConstPtr(value) => *value,
            Expr::Reg(reg) => self.reg(*reg),
            Expr::Temp(id) => self.temps.get(id).copied().unwrap_or(0),
            Expr::Load { width, addr } => self.read_mem(self.eval(addr), *width),
            Expr::Binary {
                op,
                width,
                lhs,
                rhs,
            } => {
                let a = self.eval(lhs) & width.mask();
                let b = self.eval(rhs) & width.mask();
                binary(*op, *width, a, b)
            }
            Expr::Compare {
                cond,
                width,
                lhs,
                rhs,
            } => {
                let a = self.eval(lhs) & width.mask();
                let b = self.eval(rhs) & width.mask();
                u64::from(compare(*cond, *width, a, b))
            }
            Expr::SignExtend { width, expr } => {
                sign_extend(self.eval(expr), expr.width()) as u64 & width.mask()
            }
            Expr::ZeroExtend { expr, .. } => self.eval(expr) & expr.width().mask(),
            Expr::LowPart { width, expr } => self.eval(expr) & width.mask(),
        }
    }

    /// Executes statements in order until a transfer or trap.
    ///
    /// # Returns
    ///
    /// The flow outcome of the first terminating statement, or `Flow::Next`.
    pub fn execute(&mut self, stmts: &[Stmt]) -> Flow {
        for stmt in stmts {
            match stmt {
                Stmt::SetReg { width, reg, value } => {
                    let v = sign_extend(self.eval(value), *width) as u64;
                    self.set_reg(*reg, v);
                }
                Stmt::SetTemp { temp, value } => {
                    let v = self.eval(value);
                    let _ = self.temps.insert(*temp, v);
                }
                Stmt::Store { width, addr, value } => {
                    let (a, v) = (self.eval(addr), self.eval(value));
                    self.write_mem(a, *width, v);
                }
                Stmt::If {
                    condition,
                    on_true,
                    on_false,
                } => {
                    let taken = self.eval(condition) != 0;
                    return Flow::Jump(if taken { *on_true } else { *on_false });
                }
                Stmt::Jump(target) => return Flow::Jump(self.eval(target)),
                Stmt::Call(target) => return Flow::Call(self.eval(target)),
                Stmt::Return(target) => return Flow::Return(self.eval(target)),
                Stmt::Syscall => return Flow::Syscall,
                Stmt::Breakpoint => return Flow::Breakpoint,
                Stmt::Unimplemented => return Flow::Unimplemented,
                Stmt::Fence | Stmt::Nop => {}
            }
        }
        Flow::Next
    }

    /// Lifts and executes one instruction, then updates `pc`.
    ///
    /// # Arguments
    ///
    /// * `inst` - The decoded instruction.
    /// * `address` - Address it was decoded at.
    pub fn step(&mut self, inst: &Instruction, address: u64) -> Flow {
        self.temps.clear();
        let flow = self.execute(&crate::lift::lift(inst, address));
        let next_pc = match flow {
            Flow::Jump(target) | Flow::Call(target) | Flow::Return(target) => target,
            _ => VirtAddr::new(address).advance(INSTRUCTION_SIZE).val(),
        };
        self.set_reg(Register::Pc, next_pc);
        flow
    }
}

fn binary(op: BinaryOp, width: Width, a: u64, b: u64) -> u64 {
    let shamt = (b & u64::from(width.bits() - 1)) as u32;
    let result = match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::And => a & b,
        BinaryOp::Or => a | b,
        BinaryOp::Xor => a ^ b,
        BinaryOp::Shl => a << shamt,
        BinaryOp::LogicalShr => a >> shamt,
        BinaryOp::ArithShr => (sign_extend(a, width) >> shamt) as u64,
    };
    result & width.mask()
}

fn compare(cond: Condition, width: Width, a: u64, b: u64) -> bool {
    let (sa, sb) = (sign_extend(a, width), sign_extend(b, width));
    match cond {
        Condition::Equal => a == b,
        Condition::NotEqual => a != b,
        Condition::SignedLessThan => sa < sb,
        Condition::SignedGreaterEqual => sa >= sb,
        Condition::UnsignedLessThan => a < b,
        Condition::UnsignedGreaterEqual => a >= b,
    }
}
