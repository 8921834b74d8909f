//! Guards: the actors that consume units through the negotiation protocol.
//!
//! A guard's per-round step has two halves. First it decides whether it is
//! under-equipped and, if so, asks the Station for units. Then it drains its
//! inbox in arrival order:
//!
//! | Performative | Content | Effect |
//! |--------------|---------|--------|
//! | AGREE | grant | credit the amount |
//! | COUNTER_OFFER | grant | credit only while below threshold |
//! | REQUEST | share | debit self and AGREE the amount back to the peer |
//!
//! Anything else is ignored. Share credits travel through the requester's
//! mailbox, so the requester sees them on its next drain.

use siege_types::{ActorId, GuardId, Message, MessageContent, Performative};
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::mailbox::Mailbox;

/// A resource-consuming guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    id: GuardId,
    held_units: u32,
    mailbox: Mailbox,
}

impl Guard {
    /// Create a guard holding `held_units`.
    pub fn new(held_units: u32) -> Self {
        Self::with_id(GuardId::new(), held_units)
    }

    /// Create a guard with a known ID.
    pub const fn with_id(id: GuardId, held_units: u32) -> Self {
        Self {
            id,
            held_units,
            mailbox: Mailbox::new(),
        }
    }

    /// The guard's ID.
    pub const fn id(&self) -> GuardId {
        self.id
    }

    /// The guard's message address.
    pub const fn actor_id(&self) -> ActorId {
        ActorId::Guard(self.id)
    }

    /// Units currently held.
    pub const fn held_units(&self) -> u32 {
        self.held_units
    }

    /// Whether the guard holds at least one unit.
    pub const fn is_armed(&self) -> bool {
        self.held_units > 0
    }

    /// Overwrite the held units. Used by the sweep rule, which bypasses
    /// negotiation entirely.
    pub const fn set_held_units(&mut self, units: u32) {
        self.held_units = units;
    }

    /// The guard's inbox.
    pub const fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    /// Deliver a message into the guard's inbox.
    pub fn post(&mut self, message: Message) {
        self.mailbox.post(message);
    }

    /// Ask the Station for `threshold` units when holding fewer.
    ///
    /// Re-evaluated every round with no memory of earlier requests, so a
    /// guard that stays below threshold asks again each round.
    pub fn decide_and_request(&self, threshold: u32) -> Option<Message> {
        (self.held_units < threshold).then(|| Message::request_units(self.actor_id(), threshold))
    }

    /// Ask the Station for `needed` units when holding fewer.
    pub fn request_units(&self, needed: u32) -> Option<Message> {
        if self.held_units >= needed {
            return None;
        }
        debug!(guard_id = %self.id, needed, "Guard requesting units from the station");
        Some(Message::request_units(self.actor_id(), needed))
    }

    /// Ask a peer to share `amount` units.
    pub fn request_share(&self, peer: GuardId, amount: u32) -> Message {
        Message::request_share(self.actor_id(), ActorId::Guard(peer), amount)
    }

    /// Drain the inbox in arrival order and apply each message.
    ///
    /// Returns the messages this guard sends in reply (share credits).
    pub fn process_mailbox(&mut self, threshold: u32) -> Vec<Message> {
        let mut replies = Vec::new();
        for message in self.mailbox.drain() {
            match (message.performative(), message.content()) {
                (Performative::Agree, MessageContent::Grant { amount }) => {
                    if self.credit(*amount) {
                        debug!(
                            guard_id = %self.id,
                            received = *amount,
                            held = self.held_units,
                            "Guard received units"
                        );
                    }
                }
                (Performative::CounterOffer, MessageContent::Grant { amount }) => {
                    self.consider_counter_offer(*amount, threshold);
                }
                (Performative::Request, MessageContent::Share { amount }) => {
                    if let Some(reply) = self.answer_share(message.sender(), *amount) {
                        replies.push(reply);
                    }
                }
                (performative, content) => {
                    debug!(
                        guard_id = %self.id,
                        sender = %message.sender(),
                        %performative,
                        request_type = content.request_type(),
                        "Guard ignored message"
                    );
                }
            }
        }
        replies
    }

    /// Run the guard's full per-round step: request, then drain.
    ///
    /// Returns every message the guard sends this round.
    pub fn step(&mut self, threshold: u32) -> Vec<Message> {
        let mut outgoing: Vec<Message> = self.decide_and_request(threshold).into_iter().collect();
        outgoing.extend(self.process_mailbox(threshold));
        outgoing
    }

    /// Hand `amount` units directly to `peer`, without any message.
    ///
    /// Returns `false` and changes nothing if this guard holds too few.
    pub fn share_with(&mut self, peer: &mut Self, amount: u32) -> bool {
        if self.held_units < amount {
            debug!(
                guard_id = %self.id,
                peer = %peer.id,
                amount,
                held = self.held_units,
                "Not enough units to share"
            );
            return false;
        }
        let Some(credited) = peer.held_units.checked_add(amount) else {
            warn!(
                guard_id = %self.id,
                peer = %peer.id,
                amount,
                peer_held = peer.held_units,
                "Share would overflow peer holdings"
            );
            return false;
        };
        self.held_units = self.held_units.saturating_sub(amount);
        peer.held_units = credited;
        info!(
            guard_id = %self.id,
            peer = %peer.id,
            amount,
            held = self.held_units,
            "Guard shared units"
        );
        true
    }

    /// Add `amount` to the holdings; an overflowing credit is refused.
    fn credit(&mut self, amount: u32) -> bool {
        match self.held_units.checked_add(amount) {
            Some(held) => {
                self.held_units = held;
                true
            }
            None => {
                warn!(
                    guard_id = %self.id,
                    amount,
                    held = self.held_units,
                    "Credit would overflow guard holdings"
                );
                false
            }
        }
    }

    fn consider_counter_offer(&mut self, amount: u32, threshold: u32) {
        if self.held_units < threshold && self.credit(amount) {
            debug!(
                guard_id = %self.id,
                offered = amount,
                held = self.held_units,
                "Guard accepted counter-offer"
            );
        } else {
            debug!(
                guard_id = %self.id,
                offered = amount,
                held = self.held_units,
                "Guard rejected counter-offer"
            );
        }
    }

    /// Debit self and address the credit to the requesting peer.
    fn answer_share(&mut self, requester: ActorId, amount: u32) -> Option<Message> {
        if requester.as_guard().is_none() || requester == self.actor_id() {
            return None;
        }
        if self.held_units < amount {
            debug!(
                guard_id = %self.id,
                %requester,
                amount,
                held = self.held_units,
                "Guard declined share request"
            );
            return None;
        }
        self.held_units = self.held_units.saturating_sub(amount);
        info!(
            guard_id = %self.id,
            %requester,
            amount,
            held = self.held_units,
            "Guard shared units"
        );
        Some(Message::agree(self.actor_id(), requester, amount))
    }
}

/// Borrow two distinct guards mutably by ID.
///
/// # Errors
///
/// Returns [`AgentError::SelfShare`] if both IDs are the same and
/// [`AgentError::GuardNotFound`] if either is missing.
pub fn pair_mut(
    guards: &mut [Guard],
    first: GuardId,
    second: GuardId,
) -> Result<(&mut Guard, &mut Guard), AgentError> {
    if first == second {
        return Err(AgentError::SelfShare(first));
    }
    let a = guards
        .iter()
        .position(|g| g.id == first)
        .ok_or(AgentError::GuardNotFound(first))?;
    let b = guards
        .iter()
        .position(|g| g.id == second)
        .ok_or(AgentError::GuardNotFound(second))?;

    let (low, high, swapped) = if a < b { (a, b, false) } else { (b, a, true) };
    let (head, tail) = guards.split_at_mut(high);
    let low_guard = head
        .get_mut(low)
        .ok_or(AgentError::GuardNotFound(first))?;
    let high_guard = tail
        .first_mut()
        .ok_or(AgentError::GuardNotFound(second))?;
    if swapped {
        Ok((high_guard, low_guard))
    } else {
        Ok((low_guard, high_guard))
    }
}
