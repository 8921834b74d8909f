//! The message envelope exchanged between actors.
//!
//! A [`Message`] is immutable once built: fields are private and only
//! readable through accessors. The content is a typed payload keyed by
//! request type rather than a free-form map, so a receiver matches on
//! [`MessageContent`] instead of probing for keys.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Performative;
use crate::ids::ActorId;

/// Request type name for a unit request addressed to the Station.
pub const REQUEST_TYPE_UNITS: &str = "units";

/// Request type name for a peer-to-peer share request.
pub const REQUEST_TYPE_SHARE: &str = "share";

/// Request type name carried by AGREE and COUNTER_OFFER payloads.
pub const REQUEST_TYPE_GRANT: &str = "grant";

/// Structured message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MessageContent {
    /// Ask the Station for `amount` units.
    Units {
        /// Number of units requested.
        amount: u32,
    },
    /// Ask a peer guard to hand over `amount` of its units.
    Share {
        /// Number of units needed.
        amount: u32,
    },
    /// Units granted or offered to the receiver.
    Grant {
        /// Number of units granted or offered.
        amount: u32,
    },
    /// A request type this protocol version does not act on.
    Other {
        /// The unrecognised request type name.
        request_type: String,
    },
}

impl MessageContent {
    /// Return the request type name this payload is keyed by.
    pub fn request_type(&self) -> &str {
        match self {
            Self::Units { .. } => REQUEST_TYPE_UNITS,
            Self::Share { .. } => REQUEST_TYPE_SHARE,
            Self::Grant { .. } => REQUEST_TYPE_GRANT,
            Self::Other { request_type } => request_type.as_str(),
        }
    }

    /// Return the unit quantity carried by the payload, if any.
    pub const fn amount(&self) -> Option<u32> {
        match self {
            Self::Units { amount } | Self::Share { amount } | Self::Grant { amount } => {
                Some(*amount)
            }
            Self::Other { .. } => None,
        }
    }
}

/// An immutable envelope delivered to exactly one mailbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Message {
    sender: ActorId,
    receiver: ActorId,
    performative: Performative,
    content: MessageContent,
}

impl Message {
    /// Build a message from its four parts.
    pub const fn new(
        sender: ActorId,
        receiver: ActorId,
        performative: Performative,
        content: MessageContent,
    ) -> Self {
        Self {
            sender,
            receiver,
            performative,
            content,
        }
    }

    /// A REQUEST for `amount` units addressed to the Station.
    pub const fn request_units(sender: ActorId, amount: u32) -> Self {
        Self::new(
            sender,
            ActorId::Station,
            Performative::Request,
            MessageContent::Units { amount },
        )
    }

    /// A REQUEST asking a peer to share `amount` units.
    pub const fn request_share(sender: ActorId, receiver: ActorId, amount: u32) -> Self {
        Self::new(
            sender,
            receiver,
            Performative::Request,
            MessageContent::Share { amount },
        )
    }

    /// An AGREE granting `amount` units to the receiver.
    pub const fn agree(sender: ActorId, receiver: ActorId, amount: u32) -> Self {
        Self::new(
            sender,
            receiver,
            Performative::Agree,
            MessageContent::Grant { amount },
        )
    }

    /// A COUNTER_OFFER of `amount` units to the receiver.
    pub const fn counter_offer(sender: ActorId, receiver: ActorId, amount: u32) -> Self {
        Self::new(
            sender,
            receiver,
            Performative::CounterOffer,
            MessageContent::Grant { amount },
        )
    }

    /// The actor that built the message.
    pub const fn sender(&self) -> ActorId {
        self.sender
    }

    /// The actor whose mailbox the message belongs in.
    pub const fn receiver(&self) -> ActorId {
        self.receiver
    }

    /// The speech-act tag.
    pub const fn performative(&self) -> Performative {
        self.performative
    }

    /// The structured payload.
    pub const fn content(&self) -> &MessageContent {
        &self.content
    }
}

impl core::fmt::Display for Message {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "from {} to {} [{}] {:?}",
            self.sender, self.receiver, self.performative, self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GuardId;

    #[test]
    fn unit_request_is_addressed_to_station() {
        let guard = ActorId::Guard(GuardId::new());
        let msg = Message::request_units(guard, 3);
        assert_eq!(msg.sender(), guard);
        assert_eq!(msg.receiver(), ActorId::Station);
        assert_eq!(msg.performative(), Performative::Request);
        assert_eq!(msg.content().request_type(), "units");
        assert_eq!(msg.content().amount(), Some(3));
    }

    #[test]
    fn grants_share_one_payload_shape() {
        let guard = ActorId::Guard(GuardId::new());
        let agree = Message::agree(ActorId::Station, guard, 2);
        let offer = Message::counter_offer(ActorId::Station, guard, 2);
        assert_eq!(agree.content(), offer.content());
        assert_ne!(agree.performative(), offer.performative());
    }

    #[test]
    fn other_request_type_has_no_amount() {
        let content = MessageContent::Other {
            request_type: "ammunition".to_owned(),
        };
        assert_eq!(content.request_type(), "ammunition");
        assert_eq!(content.amount(), None);
    }

    #[test]
    fn content_is_tagged_by_request_type() {
        let json = serde_json::to_value(MessageContent::Units { amount: 4 }).unwrap_or_default();
        assert_eq!(json["type"], "units");
        assert_eq!(json["amount"], 4);
    }
}
