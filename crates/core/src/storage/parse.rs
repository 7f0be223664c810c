//! Stored value parsing
//!
//! Decodes the persisted message document, including the older shape where a
//! reaction was stored as a bare count instead of a set of reactors.

use std::collections::{BTreeMap, BTreeSet};

use rusqlite::Error as SqlError;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Message, MessageId, Reactions, Reactor, Sender};

/// A message exactly as it appears in storage
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredMessage {
    id: MessageId,
    text: String,
    sender: Sender,
    timestamp: String,
    #[serde(default)]
    reply_to: Option<MessageId>,
    #[serde(default)]
    edit_count: u32,
    #[serde(default)]
    reactions: BTreeMap<String, StoredReaction>,
}

/// Either shape a reaction value has been stored in
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredReaction {
    Reactors(Vec<Reactor>),
    LegacyCount(i64),
}

/// Decoded document plus how many legacy reaction counts were rewritten
#[derive(Debug)]
pub struct Decoded {
    pub messages: Vec<Message>,
    pub migrated_reactions: usize,
}

/// Parse a stored message document
///
/// Any shape error is reported as `Error::StorageCorrupt`.
pub fn decode_messages(raw: &str) -> Result<Decoded> {
    let stored: Vec<StoredMessage> =
        serde_json::from_str(raw).map_err(|e| Error::StorageCorrupt(e.to_string()))?;

    let mut migrated_reactions = 0;
    let messages = stored
        .into_iter()
        .map(|record| {
            let mut reactions = Reactions::new();
            for (emoji, value) in record.reactions {
                let reactors = match value {
                    StoredReaction::Reactors(list) => list.into_iter().collect(),
                    StoredReaction::LegacyCount(count) => {
                        migrated_reactions += 1;
                        legacy_reactors(count)
                    }
                };
                reactions.insert_set(emoji, reactors);
            }

            Message {
                id: record.id,
                text: record.text,
                sender: record.sender,
                timestamp: record.timestamp,
                reply_to: record.reply_to,
                edit_count: record.edit_count,
                reactions,
            }
        })
        .collect();

    Ok(Decoded {
        messages,
        migrated_reactions,
    })
}

/// A count cannot say who reacted, so a positive count becomes the single
/// placeholder reactor and anything else becomes an empty set.
fn legacy_reactors(count: i64) -> BTreeSet<Reactor> {
    let mut reactors = BTreeSet::new();
    if count > 0 {
        reactors.insert(Reactor::Legacy);
    }
    reactors
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> std::result::Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for std::result::Result<T, SqlError> {
    fn optional(self) -> std::result::Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_current_schema() {
        let raw = r#"[
            {"id": 1, "text": "Hello", "sender": "me", "timestamp": "9:00:00 AM",
             "replyTo": null, "editCount": 2, "reactions": {"👍": ["other", "me"]}},
            {"id": 2, "text": "Hi!", "sender": "other", "timestamp": "9:00:05 AM",
             "replyTo": 1, "editCount": 0, "reactions": {}}
        ]"#;

        let decoded = decode_messages(raw).unwrap();
        assert_eq!(decoded.migrated_reactions, 0);
        assert_eq!(decoded.messages.len(), 2);

        let hello = &decoded.messages[0];
        assert_eq!(hello.edit_count(), 2);
        assert!(hello.reactions().contains("👍", Reactor::Me));
        assert!(hello.reactions().contains("👍", Reactor::Other));

        assert_eq!(decoded.messages[1].reply_to(), Some(MessageId(1)));
    }

    #[test]
    fn test_decode_optional_fields_default() {
        let raw = r#"[{"id": 5, "text": "bare", "sender": "other", "timestamp": "noon"}]"#;

        let decoded = decode_messages(raw).unwrap();
        let message = &decoded.messages[0];
        assert_eq!(message.reply_to(), None);
        assert_eq!(message.edit_count(), 0);
        assert!(message.reactions().is_empty());
    }

    #[test]
    fn test_decode_legacy_counts() {
        let raw = r#"[{"id": 1, "text": "old", "sender": "me", "timestamp": "t",
                       "reactions": {"👍": 2, "😂": 0, "🔥": ["me"]}}]"#;

        let decoded = decode_messages(raw).unwrap();
        assert_eq!(decoded.migrated_reactions, 2);

        let reactions = decoded.messages[0].reactions();
        let thumbs = reactions.reactors("👍").unwrap();
        assert_eq!(thumbs.len(), 1);
        assert!(thumbs.contains(&Reactor::Legacy));
        assert!(reactions.reactors("😂").is_none());
        assert!(reactions.contains("🔥", Reactor::Me));
    }

    #[test]
    fn test_decode_negative_legacy_count_is_empty() {
        let raw = r#"[{"id": 1, "text": "x", "sender": "me", "timestamp": "t",
                       "reactions": {"👎": -3}}]"#;

        let decoded = decode_messages(raw).unwrap();
        assert!(decoded.messages[0].reactions().is_empty());
    }

    #[test]
    fn test_decode_malformed_is_corrupt() {
        for raw in [
            "not json",
            r#"{"id": 1}"#,
            r#"[{"id": 1, "text": "x", "sender": "someone", "timestamp": "t"}]"#,
            r#"[{"id": 1, "text": "x", "sender": "me", "timestamp": "t", "editCount": -1}]"#,
            r#"[{"id": 1, "text": "x", "sender": "me", "timestamp": "t", "reactions": {"👍": "me"}}]"#,
        ] {
            assert!(
                matches!(decode_messages(raw), Err(Error::StorageCorrupt(_))),
                "expected corrupt for {}",
                raw
            );
        }
    }
}
