//! Enumeration types for the Siege simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Performative
// ---------------------------------------------------------------------------

/// The speech-act tag on a message, telling the receiver how to read the
/// content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum Performative {
    /// Ask the receiver for units (Station) or for a share (peer Guard).
    Request,
    /// Grant units. The receiver credits the amount unconditionally.
    Agree,
    /// Offer units the receiver may accept or reject.
    CounterOffer,
}

impl core::fmt::Display for Performative {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let tag = match self {
            Self::Request => "REQUEST",
            Self::Agree => "AGREE",
            Self::CounterOffer => "COUNTER_OFFER",
        };
        f.write_str(tag)
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The state of the contest, evaluated at the end of every round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Outcome {
    /// No termination condition holds yet.
    #[default]
    Ongoing,
    /// Armed guards match or outnumber the targets.
    AuthorityWins,
    /// The authority ran out of deployable guards or of armed guards.
    ChallengersWin,
}

impl Outcome {
    /// Whether this outcome halts the scheduler.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

// ---------------------------------------------------------------------------
// Ledger entry types
// ---------------------------------------------------------------------------

/// Category of a unit movement recorded in the ledger.
///
/// | Type | From | To |
/// |------|------|----|
/// | Dispatch | Station | Guard |
/// | DeploymentGrant | Station | Guard |
/// | Transfer | Guard | Guard |
/// | Requisition | (outside) | Guard |
/// | Seizure | Guard | (outside) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LedgerEntryType {
    /// Units dispatched by the Station in answer to a REQUEST.
    Dispatch,
    /// The single best-effort unit handed to a newly deployed guard.
    DeploymentGrant,
    /// Units moved between two guards.
    Transfer,
    /// Units created by the sweep re-equip.
    Requisition,
    /// Units removed by the sweep seizure.
    Seizure,
}

impl LedgerEntryType {
    /// Whether this movement draws down the Station store.
    pub const fn is_station_outflow(self) -> bool {
        matches!(self, Self::Dispatch | Self::DeploymentGrant)
    }
}
