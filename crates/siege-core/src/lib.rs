//! Configuration, round scheduler, and runner for the Siege simulation.
//!
//! This crate owns the per-round sequence that drives the siege: deploy,
//! grow, sweep, activate, evaluate. The actors themselves live in
//! `siege-agents`; this crate decides when they run and routes what they
//! say to each other.
//!
//! # Modules
//!
//! - [`clock`] -- Round counter and the target growth throttle.
//! - [`config`] -- Configuration loading from `siege-config.yaml` into
//!   strongly-typed structs.
//! - [`history`] -- [`RoundHistory`] data collector.
//! - [`outcome`] -- Pure end-of-round outcome evaluation.
//! - [`round`] -- The round scheduler.
//! - [`runner`] -- The async simulation loop and [`RoundCallback`].
//! - [`world`] -- [`WorldState`], snapshots, and message routing.
//!
//! [`RoundHistory`]: history::RoundHistory
//! [`RoundCallback`]: runner::RoundCallback
//! [`WorldState`]: world::WorldState

pub mod clock;
pub mod config;
pub mod history;
pub mod outcome;
pub mod round;
pub mod runner;
pub mod world;
