//! Store conservation verification.
//!
//! Units leave the Station store only through `Dispatch` and
//! `DeploymentGrant` entries. Transfers move units between guards and the
//! sweep entries create or destroy units outside the store, so none of them
//! touch the store balance.
//!
//! For the store at the end of round R the check is:
//!
//! ```text
//! initial_units - sum(station outflows up to R) == unit_store
//! ```

use siege_types::LedgerEntry;

use crate::LedgerAnomaly;

/// The result of a conservation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConservationResult {
    /// The store matches the recorded outflows.
    Balanced,
    /// The store disagrees with the recorded outflows.
    Anomaly(LedgerAnomaly),
}

/// Sum of every unit that left the Station store.
pub fn station_outflow(entries: &[LedgerEntry]) -> u64 {
    entries
        .iter()
        .filter(|e| e.entry_type.is_station_outflow())
        .fold(0_u64, |acc, e| acc.saturating_add(u64::from(e.quantity)))
}

/// Verify that the store equals the initial store minus recorded outflows.
///
/// Entries recorded after `round` are ignored so the check can be replayed
/// for any past round.
pub fn verify_store(
    round: u64,
    initial_units: u32,
    unit_store: u32,
    entries: &[LedgerEntry],
) -> ConservationResult {
    let outflow = entries
        .iter()
        .filter(|e| e.round <= round && e.entry_type.is_station_outflow())
        .fold(0_u64, |acc, e| acc.saturating_add(u64::from(e.quantity)));

    let Some(expected_store) = u64::from(initial_units).checked_sub(outflow) else {
        return ConservationResult::Anomaly(LedgerAnomaly {
            round,
            expected_store: 0,
            actual_store: unit_store,
            message: format!(
                "LEDGER_ANOMALY at round {round}: {outflow} units dispatched from an initial store of {initial_units}"
            ),
        });
    };

    if expected_store == u64::from(unit_store) {
        ConservationResult::Balanced
    } else {
        ConservationResult::Anomaly(LedgerAnomaly {
            round,
            expected_store,
            actual_store: unit_store,
            message: format!(
                "LEDGER_ANOMALY at round {round}: store holds {unit_store} units, ledger expects {expected_store}"
            ),
        })
    }
}
