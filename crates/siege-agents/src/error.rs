//! Error types for the siege-agents crate.
//!
//! Protocol shortfalls (an empty store, a refused share) are not errors:
//! they come back as zero or `false`. These variants cover callers that
//! address actors which do not exist.

use siege_types::GuardId;

/// Errors that can occur when looking up actors.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No active guard has the given ID.
    #[error("guard not found: {0}")]
    GuardNotFound(GuardId),

    /// A guard was asked to transfer units to itself.
    #[error("guard {0} cannot share with itself")]
    SelfShare(GuardId),
}
