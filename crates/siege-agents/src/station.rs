//! The Station: the resource pool that issues units and deploys guards.
//!
//! The Station owns two finite counters, the unit store and the deployable
//! slots, and neither can be oversubscribed. Every allocation is satisfied
//! from whatever is in the store at the moment it is processed, so repeated
//! requests from the same guard can never be granted twice over.

use siege_types::{ActorId, Message, MessageContent, Performative};
use tracing::debug;

use crate::mailbox::Mailbox;

/// The resource-issuing authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    unit_store: u32,
    deployable_slots: u32,
    mailbox: Mailbox,
}

impl Station {
    /// Create a station with a full store and its deployment capacity.
    pub const fn new(initial_units: u32, deployable_slots: u32) -> Self {
        Self {
            unit_store: initial_units,
            deployable_slots,
            mailbox: Mailbox::new(),
        }
    }

    /// Units left in the store.
    pub const fn unit_store(&self) -> u32 {
        self.unit_store
    }

    /// Guards that can still be deployed.
    pub const fn deployable_slots(&self) -> u32 {
        self.deployable_slots
    }

    /// The Station's inbox.
    pub const fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Deliver a message into the Station's inbox.
    pub fn post(&mut self, message: Message) {
        self.mailbox.post(message);
    }

    /// Hand out up to `requested` units from the store.
    ///
    /// Returns the number actually dispatched, `min(store, requested)`.
    /// Never fails; an empty store dispatches nothing.
    pub fn allocate_units(&mut self, requested: u32) -> u32 {
        let dispatched = self.unit_store.min(requested);
        self.unit_store = self.unit_store.saturating_sub(dispatched);
        debug!(
            requested,
            dispatched,
            remaining = self.unit_store,
            "Station dispatched units"
        );
        dispatched
    }

    /// Consume a deployment slot and grant the new guard one unit if any
    /// remain.
    ///
    /// Returns `None` without touching any counter when no slot is left,
    /// otherwise `Some(units_granted)` where `units_granted` is 0 or 1.
    pub fn try_deploy_guard(&mut self) -> Option<u32> {
        if self.deployable_slots == 0 {
            debug!("Deployment failed: no guards available");
            return None;
        }
        self.deployable_slots = self.deployable_slots.saturating_sub(1);
        let units_granted = self.allocate_units(1);
        debug!(
            units_granted,
            slots_left = self.deployable_slots,
            "Station deployed a guard"
        );
        Some(units_granted)
    }

    /// Deploy a guard, signalling failure as a zero grant.
    ///
    /// A zero return is ambiguous between "no slot" and "slot used but the
    /// store was empty"; callers that need to tell the two apart use
    /// [`try_deploy_guard`](Self::try_deploy_guard).
    pub fn deploy_guard(&mut self) -> u32 {
        self.try_deploy_guard().unwrap_or(0)
    }

    /// Drain the inbox and answer every unit request with an AGREE.
    ///
    /// Each REQUEST of type `units` is satisfied independently from the
    /// current store. Requests of any other type, and any other
    /// performative, are dropped without a reply. The inbox is empty
    /// afterwards regardless. Returns the replies for the caller to deliver.
    pub fn process_mailbox(&mut self) -> Vec<Message> {
        let mut replies = Vec::new();
        for message in self.mailbox.drain() {
            match (message.performative(), message.content()) {
                (Performative::Request, MessageContent::Units { amount }) => {
                    debug!(
                        requester = %message.sender(),
                        requested = *amount,
                        "Station received unit request"
                    );
                    let dispatched = self.allocate_units(*amount);
                    replies.push(Message::agree(ActorId::Station, message.sender(), dispatched));
                }
                (performative, content) => {
                    debug!(
                        sender = %message.sender(),
                        %performative,
                        request_type = content.request_type(),
                        "Station ignored message"
                    );
                }
            }
        }
        replies
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use siege_types::GuardId;

    use super::*;

    fn guard() -> ActorId {
        ActorId::Guard(GuardId::new())
    }

    fn granted(replies: &[Message]) -> u32 {
        replies
            .iter()
            .filter_map(|m| m.content().amount())
            .sum()
    }

    #[test]
    fn allocate_is_capped_by_store() {
        let mut station = Station::new(5, 0);
        assert_eq!(station.allocate_units(3), 3);
        assert_eq!(station.allocate_units(3), 2);
        assert_eq!(station.allocate_units(3), 0);
        assert_eq!(station.unit_store(), 0);
    }

    #[test]
    fn deploy_consumes_slot_and_grants_one_unit() {
        let mut station = Station::new(2, 1);
        assert_eq!(station.try_deploy_guard(), Some(1));
        assert_eq!(station.deployable_slots(), 0);
        assert_eq!(station.unit_store(), 1);
    }

    #[test]
    fn deploy_with_empty_store_still_uses_slot() {
        let mut station = Station::new(0, 2);
        assert_eq!(station.try_deploy_guard(), Some(0));
        assert_eq!(station.deployable_slots(), 1);
    }

    #[test]
    fn deploy_without_slots_mutates_nothing() {
        let mut station = Station::new(4, 0);
        assert_eq!(station.deploy_guard(), 0);
        assert_eq!(station.try_deploy_guard(), None);
        assert_eq!(station.unit_store(), 4);
        assert_eq!(station.deployable_slots(), 0);
    }

    #[test]
    fn unit_requests_get_agree_replies() {
        let mut station = Station::new(10, 0);
        let requester = guard();
        station.post(Message::request_units(requester, 3));
        let replies = station.process_mailbox();
        assert_eq!(replies.len(), 1);
        let reply = replies.first();
        assert_eq!(reply.map(Message::receiver), Some(requester));
        assert_eq!(reply.map(Message::performative), Some(Performative::Agree));
        assert_eq!(granted(&replies), 3);
        assert_eq!(station.unit_store(), 7);
        assert!(station.mailbox().is_empty());
    }

    #[test]
    fn concurrent_requests_cannot_overdraw() {
        let mut station = Station::new(2, 0);
        let a = guard();
        let b = guard();
        station.post(Message::request_units(a, 5));
        station.post(Message::request_units(b, 5));
        let replies = station.process_mailbox();
        assert_eq!(replies.len(), 2);
        assert_eq!(granted(&replies), 2);
        assert_eq!(station.unit_store(), 0);
    }

    #[test]
    fn duplicate_requests_from_one_guard_are_each_satisfied_from_store() {
        let mut station = Station::new(4, 0);
        let requester = guard();
        station.post(Message::request_units(requester, 3));
        station.post(Message::request_units(requester, 3));
        let replies = station.process_mailbox();
        assert_eq!(granted(&replies), 4);
        assert_eq!(station.unit_store(), 0);
    }

    #[test]
    fn unknown_request_types_are_dropped() {
        let mut station = Station::new(10, 0);
        let sender = guard();
        station.post(Message::new(
            sender,
            ActorId::Station,
            Performative::Request,
            MessageContent::Other {
                request_type: "vehicles".to_owned(),
            },
        ));
        station.post(Message::agree(sender, ActorId::Station, 9));
        let replies = station.process_mailbox();
        assert!(replies.is_empty());
        assert!(station.mailbox().is_empty());
        assert_eq!(station.unit_store(), 10);
    }

    proptest! {
        #[test]
        fn store_is_conserved_across_allocations(
            initial in 0_u32..1_000,
            requests in proptest::collection::vec(0_u32..100, 0..50),
        ) {
            let mut station = Station::new(initial, 0);
            let mut dispatched_total: u64 = 0;
            for requested in requests {
                let dispatched = station.allocate_units(requested);
                prop_assert!(dispatched <= requested);
                dispatched_total = dispatched_total.saturating_add(u64::from(dispatched));
                prop_assert_eq!(
                    u64::from(station.unit_store()),
                    u64::from(initial).saturating_sub(dispatched_total)
                );
            }
            prop_assert!(dispatched_total <= u64::from(initial));
        }
    }
}
