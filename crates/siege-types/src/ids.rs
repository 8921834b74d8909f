//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Guards and targets each get a strongly-typed ID so the two populations
//! cannot be mixed up at compile time. [`ActorId`] is the address used on
//! message envelopes: it names the Station, a Guard, or a Target.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a guard.
    GuardId
}

define_id! {
    /// Unique identifier for a target.
    TargetId
}

define_id! {
    /// Unique identifier for a ledger entry (unit movement record).
    LedgerEntryId
}

/// The address of an actor on a message envelope.
///
/// There is exactly one Station per world, so it needs no identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ActorId {
    /// The resource-issuing authority.
    Station,
    /// A resource-consuming guard.
    Guard(GuardId),
    /// A challenger occupying a grid cell.
    Target(TargetId),
}

impl ActorId {
    /// Return the guard ID if this address names a guard.
    pub const fn as_guard(self) -> Option<GuardId> {
        match self {
            Self::Guard(id) => Some(id),
            Self::Station | Self::Target(_) => None,
        }
    }
}

impl From<GuardId> for ActorId {
    fn from(id: GuardId) -> Self {
        Self::Guard(id)
    }
}

impl From<TargetId> for ActorId {
    fn from(id: TargetId) -> Self {
        Self::Target(id)
    }
}

impl core::fmt::Display for ActorId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Station => write!(f, "station"),
            Self::Guard(id) => write!(f, "guard:{id}"),
            Self::Target(id) => write!(f, "target:{id}"),
        }
    }
}
