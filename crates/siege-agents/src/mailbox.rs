//! Per-actor inbox of pending messages.

use std::collections::VecDeque;

use siege_types::Message;

/// An ordered inbox owned by exactly one actor.
///
/// Messages are appended in arrival order and only ever leave through
/// [`drain`](Mailbox::drain), which empties the inbox in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mailbox {
    messages: VecDeque<Message>,
}

impl Mailbox {
    /// Create an empty mailbox.
    pub const fn new() -> Self {
        Self {
            messages: VecDeque::new(),
        }
    }

    /// Append a message at the back.
    pub fn post(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    /// Remove and return every pending message in arrival order.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.messages).into()
    }

    /// Number of pending messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no message is pending.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over pending messages without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}
