//! Actors for the Siege simulation.
//!
//! Three kinds of actor share the world:
//!
//! - The [`Station`] holds the finite unit store and a bounded number of
//!   deployment slots. It answers unit requests and never sends unprompted.
//! - A [`Guard`] consumes units. It asks the Station for more when under
//!   threshold and can trade units with a peer.
//! - A [`Target`] wanders the grid and is otherwise passive.
//!
//! Every actor owns exactly one [`Mailbox`]. Actors never write into each
//! other's inbox: the messages an actor emits are returned from its step and
//! routed by the scheduler.
//!
//! # Modules
//!
//! - [`error`] -- Error types for actor lookups.
//! - [`guard`] -- Guard decisions, inbox handling, and peer sharing.
//! - [`mailbox`] -- The per-actor inbox.
//! - [`station`] -- The resource authority.
//! - [`target`] -- Wandering targets.

pub mod error;
pub mod guard;
pub mod mailbox;
pub mod station;
pub mod target;

pub use error::AgentError;
pub use guard::{Guard, pair_mut};
pub use mailbox::Mailbox;
pub use station::Station;
pub use target::Target;
