//! The unit ledger: an append-only log of every unit movement.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Typed endpoints**: each entry type fixes who may appear on each side.
//! - **Conservation**: the Station store equals the initial store minus
//!   recorded outflows at the end of every round.

use siege_types::{ActorId, GuardId, LedgerEntry, LedgerEntryType};

use crate::conservation::{self, ConservationResult};
use crate::{LedgerError, TransactionBuilder};

/// The ledger tracking all unit movements in the simulation.
#[derive(Debug, Default)]
pub struct UnitLedger {
    /// All entries, in insertion order.
    entries: Vec<LedgerEntry>,
}

impl UnitLedger {
    /// Create a new empty ledger.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Return the number of entries in the ledger.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a pre-built [`LedgerEntry`].
    pub fn append(&mut self, entry: LedgerEntry) {
        self.entries.push(entry);
    }

    /// Validate a builder and append the resulting entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record(&mut self, builder: TransactionBuilder) -> Result<&LedgerEntry, LedgerError> {
        let entry = builder.build()?;
        self.entries.push(entry);
        self.entries.last().ok_or(LedgerError::InternalError(
            "failed to retrieve entry after append",
        ))
    }

    /// Record units dispatched by the Station in answer to a REQUEST.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_dispatch(
        &mut self,
        round: u64,
        guard: GuardId,
        quantity: u32,
    ) -> Result<&LedgerEntry, LedgerError> {
        self.record(
            TransactionBuilder::new(round, LedgerEntryType::Dispatch)
                .from(ActorId::Station)
                .to(ActorId::Guard(guard))
                .quantity(quantity),
        )
    }

    /// Record the unit handed to a freshly deployed guard.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_deployment_grant(
        &mut self,
        round: u64,
        guard: GuardId,
        quantity: u32,
    ) -> Result<&LedgerEntry, LedgerError> {
        self.record(
            TransactionBuilder::new(round, LedgerEntryType::DeploymentGrant)
                .from(ActorId::Station)
                .to(ActorId::Guard(guard))
                .quantity(quantity),
        )
    }

    /// Record units moved from one guard to another.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_transfer(
        &mut self,
        round: u64,
        from: GuardId,
        to: GuardId,
        quantity: u32,
    ) -> Result<&LedgerEntry, LedgerError> {
        self.record(
            TransactionBuilder::new(round, LedgerEntryType::Transfer)
                .from(ActorId::Guard(from))
                .to(ActorId::Guard(to))
                .quantity(quantity),
        )
    }

    /// Record units handed to a guard by the sweep re-equip.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_requisition(
        &mut self,
        round: u64,
        guard: GuardId,
        quantity: u32,
    ) -> Result<&LedgerEntry, LedgerError> {
        self.record(
            TransactionBuilder::new(round, LedgerEntryType::Requisition)
                .to(ActorId::Guard(guard))
                .quantity(quantity),
        )
    }

    /// Record units taken from a guard by the sweep.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_seizure(
        &mut self,
        round: u64,
        guard: GuardId,
        quantity: u32,
    ) -> Result<&LedgerEntry, LedgerError> {
        self.record(
            TransactionBuilder::new(round, LedgerEntryType::Seizure)
                .from(ActorId::Guard(guard))
                .quantity(quantity),
        )
    }

    /// Check the Station store against the recorded outflows.
    pub fn verify_store(&self, round: u64, initial_units: u32, unit_store: u32) -> ConservationResult {
        conservation::verify_store(round, initial_units, unit_store, &self.entries)
    }

    /// Total units that ever left the Station store.
    pub fn station_outflow_total(&self) -> u64 {
        conservation::station_outflow(&self.entries)
    }

    /// Return all entries recorded in the given round.
    pub fn entries_for_round(&self, round: u64) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| e.round == round).collect()
    }

    /// Return every entry in insertion order.
    pub fn all_entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Net units recorded into (positive) or out of (negative) a guard.
    pub fn guard_net_flow(&self, guard: GuardId) -> i64 {
        let actor = Some(ActorId::Guard(guard));
        self.entries.iter().fold(0_i64, |acc, entry| {
            let qty = i64::from(entry.quantity);
            let acc = if entry.to == actor {
                acc.saturating_add(qty)
            } else {
                acc
            };
            if entry.from == actor {
                acc.saturating_sub(qty)
            } else {
                acc
            }
        })
    }
}
