//! Transaction builder and endpoint validation for the unit ledger.
//!
//! Each [`LedgerEntryType`] has a fixed contract for its endpoints: the
//! Station only ever appears as a source, sweep requisitions have no source,
//! sweep seizures have no destination. The builder rejects anything else.

use chrono::Utc;

use siege_types::{ActorId, LedgerEntry, LedgerEntryId, LedgerEntryType};

use crate::LedgerError;

/// The kind of endpoint an entry type expects on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Station,
    Guard,
    Outside,
}

impl Endpoint {
    const fn name(self) -> &'static str {
        match self {
            Self::Station => "station",
            Self::Guard => "guard",
            Self::Outside => "none",
        }
    }

    const fn accepts(self, actor: Option<ActorId>) -> bool {
        matches!(
            (self, actor),
            (Self::Station, Some(ActorId::Station))
                | (Self::Guard, Some(ActorId::Guard(_)))
                | (Self::Outside, None)
        )
    }
}

/// Builder for constructing validated [`LedgerEntry`] values.
///
/// # Examples
///
/// ```
/// use siege_ledger::TransactionBuilder;
/// use siege_types::{ActorId, GuardId, LedgerEntryType};
///
/// let entry = TransactionBuilder::new(1, LedgerEntryType::Dispatch)
///     .from(ActorId::Station)
///     .to(ActorId::Guard(GuardId::new()))
///     .quantity(3)
///     .build();
///
/// assert!(entry.is_ok());
/// ```
#[derive(Debug)]
pub struct TransactionBuilder {
    round: u64,
    entry_type: LedgerEntryType,
    from: Option<ActorId>,
    to: Option<ActorId>,
    quantity: Option<u32>,
}

impl TransactionBuilder {
    /// Start building a ledger entry for the given round and entry type.
    pub const fn new(round: u64, entry_type: LedgerEntryType) -> Self {
        Self {
            round,
            entry_type,
            from: None,
            to: None,
            quantity: None,
        }
    }

    /// Set the source actor.
    #[must_use]
    pub const fn from(mut self, actor: ActorId) -> Self {
        self.from = Some(actor);
        self
    }

    /// Set the destination actor.
    #[must_use]
    pub const fn to(mut self, actor: ActorId) -> Self {
        self.to = Some(actor);
        self
    }

    /// Set the number of units moved.
    #[must_use]
    pub const fn quantity(mut self, qty: u32) -> Self {
        self.quantity = Some(qty);
        self
    }

    /// Validate inputs and produce a [`LedgerEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingField`] if no quantity was set,
    /// [`LedgerError::ZeroQuantity`] if it is zero, and
    /// [`LedgerError::InvalidEndpoint`] if either side breaks the contract
    /// for the entry type.
    pub fn build(self) -> Result<LedgerEntry, LedgerError> {
        let quantity = self.quantity.ok_or(LedgerError::MissingField("quantity"))?;
        if quantity == 0 {
            return Err(LedgerError::ZeroQuantity);
        }

        let (expected_from, expected_to) = expected_endpoints(self.entry_type);
        check_endpoint(self.entry_type, "from", expected_from, self.from)?;
        check_endpoint(self.entry_type, "to", expected_to, self.to)?;

        Ok(LedgerEntry {
            id: LedgerEntryId::new(),
            round: self.round,
            entry_type: self.entry_type,
            from: self.from,
            to: self.to,
            quantity,
            created_at: Utc::now(),
        })
    }
}

fn check_endpoint(
    entry_type: LedgerEntryType,
    side: &'static str,
    expected: Endpoint,
    actual: Option<ActorId>,
) -> Result<(), LedgerError> {
    if expected.accepts(actual) {
        return Ok(());
    }
    Err(LedgerError::InvalidEndpoint {
        entry_type,
        side,
        expected: expected.name(),
        actual: actual.map_or_else(|| "none".to_owned(), |a| a.to_string()),
    })
}

/// Return the expected (from, to) endpoints for each [`LedgerEntryType`].
const fn expected_endpoints(entry_type: LedgerEntryType) -> (Endpoint, Endpoint) {
    match entry_type {
        LedgerEntryType::Dispatch | LedgerEntryType::DeploymentGrant => {
            (Endpoint::Station, Endpoint::Guard)
        }
        LedgerEntryType::Transfer => (Endpoint::Guard, Endpoint::Guard),
        LedgerEntryType::Requisition => (Endpoint::Outside, Endpoint::Guard),
        LedgerEntryType::Seizure => (Endpoint::Guard, Endpoint::Outside),
    }
}

#[cfg(test)]
mod tests {
    use siege_types::{GuardId, TargetId};

    use super::*;

    fn guard() -> ActorId {
        ActorId::Guard(GuardId::new())
    }

    #[test]
    fn valid_dispatch_builds() {
        let entry = TransactionBuilder::new(4, LedgerEntryType::Dispatch)
            .from(ActorId::Station)
            .to(guard())
            .quantity(2)
            .build();
        let entry = entry.ok();
        assert_eq!(entry.as_ref().map(|e| e.round), Some(4));
        assert_eq!(entry.map(|e| e.quantity), Some(2));
    }

    #[test]
    fn zero_quantity_rejected() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Transfer)
            .from(guard())
            .to(guard())
            .quantity(0)
            .build();
        assert!(matches!(result, Err(LedgerError::ZeroQuantity)));
    }

    #[test]
    fn missing_quantity_rejected() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Transfer)
            .from(guard())
            .to(guard())
            .build();
        assert!(matches!(result, Err(LedgerError::MissingField("quantity"))));
    }

    #[test]
    fn station_cannot_receive_units() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Dispatch)
            .from(guard())
            .to(ActorId::Station)
            .quantity(1)
            .build();
        assert!(matches!(
            result,
            Err(LedgerError::InvalidEndpoint { side: "from", .. })
        ));
    }

    #[test]
    fn targets_never_hold_units() {
        let result = TransactionBuilder::new(1, LedgerEntryType::Transfer)
            .from(guard())
            .to(ActorId::Target(TargetId::new()))
            .quantity(1)
            .build();
        assert!(matches!(
            result,
            Err(LedgerError::InvalidEndpoint { side: "to", .. })
        ));
    }

    #[test]
    fn requisition_has_no_source() {
        let ok = TransactionBuilder::new(1, LedgerEntryType::Requisition)
            .to(guard())
            .quantity(1)
            .build();
        assert!(ok.is_ok());

        let bad = TransactionBuilder::new(1, LedgerEntryType::Requisition)
            .from(ActorId::Station)
            .to(guard())
            .quantity(1)
            .build();
        assert!(bad.is_err());
    }
}
