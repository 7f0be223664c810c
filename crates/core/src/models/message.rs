//! Message model for the notes thread

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Reactions, Sender};

/// Message identifier, also the creation order of the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A note in the thread
///
/// Only the message store creates or mutates messages; everything else sees
/// them through the read accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub(crate) id: MessageId,
    pub(crate) text: String,
    pub(crate) sender: Sender,
    pub(crate) timestamp: String,
    pub(crate) reply_to: Option<MessageId>,
    pub(crate) edit_count: u32,
    pub(crate) reactions: Reactions,
}

impl Message {
    pub(crate) fn new(
        id: MessageId,
        text: String,
        sender: Sender,
        timestamp: String,
        reply_to: Option<MessageId>,
    ) -> Self {
        Self {
            id,
            text,
            sender,
            timestamp,
            reply_to,
            edit_count: 0,
            reactions: Reactions::new(),
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Raw author text; markup is left for the renderer
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// Display timestamp captured when the message was sent
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn reply_to(&self) -> Option<MessageId> {
        self.reply_to
    }

    pub fn edit_count(&self) -> u32 {
        self.edit_count
    }

    pub fn is_edited(&self) -> bool {
        self.edit_count > 0
    }

    pub fn reactions(&self) -> &Reactions {
        &self.reactions
    }
}
