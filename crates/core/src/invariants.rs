//! Message collection invariants
//!
//! `check_messages` inspects data that came from storage and reports what is
//! wrong without panicking. The `assert_*` helpers guard the message store's
//! own mutations and are compiled out in release builds.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Message, MessageId};

/// A broken invariant found in a message collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Two messages share an id
    DuplicateId(MessageId),
    /// A reply points at itself or at a later id
    ForwardReply { id: MessageId, reply_to: MessageId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::DuplicateId(id) => write!(f, "duplicate message id {}", id),
            Violation::ForwardReply { id, reply_to } => {
                write!(f, "message {} replies to non-earlier id {}", id, reply_to)
            }
        }
    }
}

/// Report every violation in a collection, in collection order
pub fn check_messages(messages: &[Message]) -> Vec<Violation> {
    let mut seen = HashSet::with_capacity(messages.len());
    let mut violations = Vec::new();

    for message in messages {
        if !seen.insert(message.id()) {
            violations.push(Violation::DuplicateId(message.id()));
        }
        if let Some(reply_to) = message.reply_to() {
            if reply_to >= message.id() {
                violations.push(Violation::ForwardReply {
                    id: message.id(),
                    reply_to,
                });
            }
        }
    }

    violations
}

/// Validate a message the store just created
pub fn assert_new_message(message: &Message, existing: &[Message]) {
    debug_assert!(
        !message.text().trim().is_empty(),
        "Message {} was created with blank text",
        message.id()
    );

    debug_assert!(
        message.edit_count() == 0 && message.reactions().is_empty(),
        "Message {} was created with history",
        message.id()
    );

    debug_assert!(
        existing.iter().all(|m| m.id() < message.id()),
        "Message {} is not newer than every existing id",
        message.id()
    );

    if let Some(reply_to) = message.reply_to() {
        debug_assert!(
            reply_to < message.id(),
            "Message {} replies to non-earlier id {}",
            message.id(),
            reply_to
        );
    }
}

/// Validate an edit did not rewind the edit counter
pub fn assert_edit_monotonic(before: &Message, after: &Message) {
    debug_assert!(
        after.edit_count() >= before.edit_count(),
        "Message {} edit count went from {} to {}",
        after.id(),
        before.edit_count(),
        after.edit_count()
    );
}
