//! Linear Sweep.
//!
//! Walks a byte buffer one instruction width at a time and decodes, renders and
//! lifts every word independently. It provides:
//! 1. **Listing:** An iterator of `ListingEntry` records, one per word.
//! 2. **Recovery:** Undecodable words are reported and skipped by one instruction width;
//!    a trailing partial word produces a `Truncated` entry and ends the sweep.
//! 3. **Statistics:** `SweepStats` tallies formats, mnemonics, pseudo-instructions and
//!    control-flow kinds.
//!
//! No block discovery or cross-instruction analysis happens here.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::common::{DecodeError, INSTRUCTION_BYTES, VirtAddr};
use crate::isa::decode::decode_bytes;
use crate::isa::disasm::disassemble;
use crate::isa::instruction::Instruction;
use crate::lift::{Branch, BranchKind, Stmt, branches, lift};

/// One swept location.
#[derive(Clone, Debug, Serialize)]
pub struct ListingEntry {
    /// Address of the word.
    pub address: u64,
    /// Raw word, when four bytes were available.
    pub raw: Option<u32>,
    /// Decoded instruction or the reason decoding failed.
    pub result: Result<Instruction, DecodeError>,
    /// Rendered text; empty for undecodable words.
    pub text: String,
    /// Outgoing control-flow edges.
    pub branches: Vec<Branch>,
    /// Lifted statements; empty for undecodable words.
    pub il: Vec<Stmt>,
}

impl ListingEntry {
    fn decoded(inst: Instruction, address: u64) -> Self {
        Self {
            address,
            raw: Some(inst.raw),
            text: disassemble(&inst, address),
            branches: branches(&inst, address),
            il: lift(&inst, address),
            result: Ok(inst),
        }
    }

    fn failed(err: DecodeError) -> Self {
        Self {
            address: err.address(),
            raw: err.word(),
            text: String::new(),
            branches: Vec::new(),
            il: Vec::new(),
            result: Err(err),
        }
    }

    /// Returns the decoded instruction, if any.
    pub fn instruction(&self) -> Option<&Instruction> {
        self.result.as_ref().ok()
    }
}

/// Iterator over the words of a code buffer.
#[derive(Clone, Debug)]
pub struct Sweep<'a> {
    data: &'a [u8],
    base: VirtAddr,
    offset: usize,
    limit: usize,
    stop_on_error: bool,
    done: bool,
}

impl<'a> Sweep<'a> {
    /// Creates a sweep over `data`, whose first byte lives at `base`.
    pub const fn new(data: &'a [u8], base: u64) -> Self {
        Self {
            data,
            base: VirtAddr::new(base),
            offset: 0,
            limit: data.len(),
            stop_on_error: false,
            done: false,
        }
    }

    /// Limits the sweep to the first `max_len` bytes.
    #[must_use]
    pub fn max_len(mut self, max_len: Option<usize>) -> Self {
        if let Some(max_len) = max_len {
            self.limit = self.limit.min(max_len);
        }
        self
    }

    /// Ends the sweep at the first undecodable word.
    #[must_use]
    pub const fn stop_on_error(mut self, stop: bool) -> Self {
        self.stop_on_error = stop;
        self
    }
}

impl Iterator for Sweep<'_> {
    type Item = ListingEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.limit {
            return None;
        }
        let address = self.base.advance(self.offset as u64).val();
        let rest = self.data.get(self.offset..self.limit)?;

        let entry = match decode_bytes(rest, address, None) {
            Ok(inst) => ListingEntry::decoded(inst, address),
            Err(err) => {
                debug!(address = %VirtAddr::new(address), %err, "skipping undecodable word");
                self.done = self.stop_on_error || matches!(err, DecodeError::Truncated { .. });
                ListingEntry::failed(err)
            }
        };
        self.offset += INSTRUCTION_BYTES;
        Some(entry)
    }
}

/// Summary counts over a sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepStats {
    /// Words that decoded.
    pub decoded: usize,
    /// Words that did not decode (including a trailing partial word).
    pub undecodable: usize,
    /// Decoded words per format letter.
    pub by_format: BTreeMap<&'static str, usize>,
    /// Decoded words per mnemonic.
    pub by_mnemonic: BTreeMap<&'static str, usize>,
    /// Words rewritten to a pseudo-instruction (`j`, `li`, `mv`, `ret`).
    pub pseudo: usize,
    /// Conditional branches.
    pub conditional_branches: usize,
    /// Unconditional jumps.
    pub jumps: usize,
    /// Calls.
    pub calls: usize,
    /// Returns.
    pub returns: usize,
}

impl SweepStats {
    /// Adds one entry to the tally.
    pub fn record(&mut self, entry: &ListingEntry) {
        let Some(inst) = entry.instruction() else {
            self.undecodable += 1;
            return;
        };
        self.decoded += 1;
        *self.by_format.entry(inst.format.name()).or_default() += 1;
        *self.by_mnemonic.entry(inst.mnemonic.name()).or_default() += 1;
        if inst.mnemonic.is_pseudo() {
            self.pseudo += 1;
        }
        for branch in &entry.branches {
            match branch.kind {
                BranchKind::TrueBranch => self.conditional_branches += 1,
                BranchKind::UnconditionalBranch => self.jumps += 1,
                BranchKind::Call => self.calls += 1,
                BranchKind::FunctionReturn => self.returns += 1,
                BranchKind::FalseBranch => {}
            }
        }
    }
}

impl<'e> FromIterator<&'e ListingEntry> for SweepStats {
    fn from_iter<T: IntoIterator<Item = &'e ListingEntry>>(iter: T) -> Self {
        let mut stats = Self::default();
        for entry in iter {
            stats.record(entry);
        }
        stats
    }
}
