//! Grid placement and movement for the Siege simulation.
//!
//! Targets live on a toroidal grid, but the negotiation core never looks at
//! positions. This crate is the collaborator that owns the geometry and
//! exposes the [`Occupant`] contract the core relies on.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid construction.
//! - [`grid`] -- The [`Grid`], Moore neighbourhoods, placement, and random steps.

pub mod error;
pub mod grid;

pub use error::WorldError;
pub use grid::{Grid, Occupant};
