//! Unit ledger and store bookkeeping for the Siege simulation.
//!
//! Every unit that leaves the Station store is recorded here, together with
//! the guard-to-guard transfers and the sweep adjustments that move units
//! outside the negotiation protocol. Units are never created from nothing
//! inside the store: the only way down is a recorded outflow.
//!
//! # Architecture
//!
//! - [`ledger`] -- The [`UnitLedger`] struct: append-only log with recording methods.
//! - [`transaction`] -- The [`TransactionBuilder`] for validated entry construction.
//! - [`conservation`] -- Store conservation verification.
//!
//! # Conservation Law
//!
//! At the end of every round:
//!
//! ```text
//! initial_units == unit_store + sum(Dispatch + DeploymentGrant)
//! ```
//!
//! A violation produces a [`LedgerAnomaly`]. The ledger never panics; it
//! returns errors.
//!
//! | Type | From | To |
//! |------|------|----|
//! | Dispatch | Station | Guard |
//! | DeploymentGrant | Station | Guard |
//! | Transfer | Guard | Guard |
//! | Requisition | -- | Guard |
//! | Seizure | Guard | -- |
//!
//! # Usage
//!
//! ```
//! use siege_ledger::UnitLedger;
//! use siege_ledger::conservation::ConservationResult;
//! use siege_types::GuardId;
//!
//! let mut ledger = UnitLedger::new();
//! let guard = GuardId::new();
//!
//! // Station dispatches 3 units out of an initial store of 10.
//! ledger.record_dispatch(1, guard, 3).ok();
//!
//! assert_eq!(ledger.verify_store(1, 10, 7), ConservationResult::Balanced);
//! ```

pub mod conservation;
pub mod ledger;
pub mod transaction;

// Re-export primary types at crate root.
pub use conservation::ConservationResult;
pub use ledger::UnitLedger;
pub use transaction::TransactionBuilder;

use siege_types::LedgerEntryType;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Quantity must be strictly positive.
    #[error("ledger entry quantity must be non-zero")]
    ZeroQuantity,

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The source or destination does not match the entry type.
    #[error("invalid endpoint for {entry_type:?} {side}: expected {expected}, got {actual}")]
    InvalidEndpoint {
        /// The entry type being validated.
        entry_type: LedgerEntryType,
        /// Which side of the entry ("from" or "to").
        side: &'static str,
        /// The expected endpoint kind.
        expected: &'static str,
        /// The actual endpoint.
        actual: String,
    },

    /// An internal error that should not occur in normal operation.
    #[error("internal ledger error: {0}")]
    InternalError(&'static str),
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A store conservation violation detected at the end of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// The round where the anomaly was detected.
    pub round: u64,
    /// Store size derived from the initial store minus recorded outflows.
    pub expected_store: u64,
    /// Store size actually held by the Station.
    pub actual_store: u32,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
