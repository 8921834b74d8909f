//! Plain data structs shared across the workspace: grid cells, ledger
//! entries, and the world snapshot polled by presentation layers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{LedgerEntryType, Outcome};
use crate::ids::{ActorId, GuardId, LedgerEntryId};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A cell on the toroidal grid, addressed by column and row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Cell {
    /// Column, `0..width`.
    pub x: u32,
    /// Row, `0..height`.
    pub y: u32,
}

impl Cell {
    /// Build a cell from its coordinates.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// LedgerEntry
// ---------------------------------------------------------------------------

/// A single recorded unit movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LedgerEntry {
    /// Unique entry identifier.
    pub id: LedgerEntryId,
    /// The round in which the movement happened.
    pub round: u64,
    /// The category of movement.
    pub entry_type: LedgerEntryType,
    /// Source actor (`None` for sweep requisitions).
    pub from: Option<ActorId>,
    /// Destination actor (`None` for sweep seizures).
    pub to: Option<ActorId>,
    /// Number of units moved (always positive).
    pub quantity: u32,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// WorldSnapshot
// ---------------------------------------------------------------------------

/// Read-only view of the world after a round, for external reporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldSnapshot {
    /// Number of rounds completed.
    pub round: u64,
    /// Units left in the Station store.
    pub unit_store: u32,
    /// Guards the Station can still deploy.
    pub deployable_slots: u32,
    /// Active guards.
    pub guard_count: u32,
    /// Active targets.
    pub target_count: u32,
    /// Guards holding at least one unit.
    pub armed_guard_count: u32,
    /// Units held by each guard.
    pub per_guard_units: BTreeMap<GuardId, u32>,
    /// Contest state at the time of the snapshot.
    pub outcome: Outcome,
}
