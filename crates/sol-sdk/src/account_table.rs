//! Canonical account table.
//!
//! Collects every key referenced by a batch of instructions, merges the
//! access flags of repeated keys, and orders the result into four runs:
//!
//! ```text
//!   [ signer+writable | signer+readonly | writable | readonly ]
//! ```
//!
//! The fee payer is always first. Within a run, keys keep the order in which
//! they were first seen.

use std::collections::HashMap;

use log::{debug, trace};

use crate::instruction::{CompiledInstruction, Instruction};
use crate::pubkey::PublicKey;

#[derive(Debug, Clone)]
struct TableEntry {
    key: PublicKey,
    is_signer: bool,
    is_writable: bool,
    /// Insertion counter; breaks ties inside a run.
    rank: usize,
}

/// Growable entry list plus key -> slot map.
#[derive(Default)]
struct TableBuilder {
    entries: Vec<TableEntry>,
    slots: HashMap<PublicKey, usize>,
}

impl TableBuilder {
    /// Insert `key` or strengthen its flags. Flags only ever OR together.
    fn upsert(&mut self, key: PublicKey, is_signer: bool, is_writable: bool) {
        if let Some(&slot) = self.slots.get(&key) {
            let entry = &mut self.entries[slot];
            entry.is_signer |= is_signer;
            entry.is_writable |= is_writable;
            return;
        }

        let rank = self.entries.len();
        self.slots.insert(key, rank);
        self.entries.push(TableEntry {
            key,
            is_signer,
            is_writable,
            rank,
        });
    }
}

/// Per-class sizes of a compiled table, before narrowing to header bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub total: usize,
    pub signers: usize,
    pub readonly_signed: usize,
    pub readonly_unsigned: usize,
}

/// The deduplicated, ordered account table for one compile call.
#[derive(Debug, Clone)]
pub struct AccountTable {
    keys: Vec<PublicKey>,
    counts: TableCounts,
    positions: HashMap<PublicKey, usize>,
}

impl AccountTable {
    /// Build the table for `fee_payer` and `instructions`.
    ///
    /// Total over any input: an empty instruction list yields a table holding
    /// only the fee payer.
    pub fn compile(fee_payer: &PublicKey, instructions: &[Instruction]) -> Self {
        let mut builder = TableBuilder::default();

        // Fee payer is always signer + writable and takes the lowest rank.
        builder.upsert(*fee_payer, true, true);

        for ix in instructions {
            for meta in &ix.accounts {
                builder.upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            // Program IDs are non-signer, read-only accounts.
            builder.upsert(ix.program_id, false, false);
        }

        let mut entries = builder.entries;
        entries.sort_by_key(|e| (!e.is_signer, !e.is_writable, e.rank));

        let counts = TableCounts {
            total: entries.len(),
            signers: entries.iter().filter(|e| e.is_signer).count(),
            readonly_signed: entries
                .iter()
                .filter(|e| e.is_signer && !e.is_writable)
                .count(),
            readonly_unsigned: entries
                .iter()
                .filter(|e| !e.is_signer && !e.is_writable)
                .count(),
        };

        let positions = entries
            .iter()
            .enumerate()
            .map(|(pos, e)| (e.key, pos))
            .collect();

        for (pos, e) in entries.iter().enumerate() {
            trace!(
                "account {pos}: {} signer={} writable={}",
                e.key,
                e.is_signer,
                e.is_writable
            );
        }
        debug!(
            "compiled account table: {} keys, {} signers, {}/{} readonly signed/unsigned",
            counts.total, counts.signers, counts.readonly_signed, counts.readonly_unsigned
        );

        Self {
            keys: entries.iter().map(|e| e.key).collect(),
            counts,
            positions,
        }
    }

    pub fn keys(&self) -> &[PublicKey] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<PublicKey> {
        self.keys
    }

    pub fn counts(&self) -> TableCounts {
        self.counts
    }

    pub fn position(&self, key: &PublicKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Rewrite `ix` as indices into this table.
    ///
    /// The caller must have compiled this table from a list containing `ix`
    /// and checked that every position fits a `u8`. A miss is a bug in the
    /// compiler, not bad input, so it panics.
    pub(crate) fn compile_instruction(&self, ix: &Instruction) -> CompiledInstruction {
        CompiledInstruction {
            program_id_index: self.index_u8(&ix.program_id),
            accounts: ix.accounts.iter().map(|m| self.index_u8(&m.pubkey)).collect(),
            data: ix.data.clone(),
        }
    }

    fn index_u8(&self, key: &PublicKey) -> u8 {
        let pos = self
            .position(key)
            .unwrap_or_else(|| panic!("account {key} missing from its own compiled table"));
        u8::try_from(pos).unwrap_or_else(|_| panic!("account index {pos} exceeds u8"))
    }
}
