//! Shared type definitions for the Siege simulation.
//!
//! Every crate in the workspace speaks in these types. They derive `serde`
//! and `ts-rs` so an external presentation layer can poll snapshots without
//! linking against the engine.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers and the [`ActorId`] message address
//! - [`enums`] -- Performatives, outcomes, and ledger entry types
//! - [`message`] -- The immutable [`Message`] envelope and its payload
//! - [`structs`] -- Grid cells, ledger entries, and the world snapshot

pub mod enums;
pub mod ids;
pub mod message;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{LedgerEntryType, Outcome, Performative};
pub use ids::{ActorId, GuardId, LedgerEntryId, TargetId};
pub use message::{
    Message, MessageContent, REQUEST_TYPE_GRANT, REQUEST_TYPE_SHARE, REQUEST_TYPE_UNITS,
};
pub use structs::{Cell, LedgerEntry, WorldSnapshot};
