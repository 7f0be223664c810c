//! Message collection persistence over a blob store

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::invariants;
use crate::models::Message;
use crate::storage::parse::{decode_messages, Decoded};
use crate::storage::{BlobStore, MessagePersistence};

/// Key the message document is stored under unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "notes.messages";

/// Stores the whole collection as one JSON document under a single key
pub struct BlobPersistence<B> {
    blobs: B,
    key: String,
}

impl<B: BlobStore> BlobPersistence<B> {
    pub fn new(blobs: B, key: impl Into<String>) -> Self {
        Self {
            blobs,
            key: key.into(),
        }
    }

    pub fn with_default_key(blobs: B) -> Self {
        Self::new(blobs, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key that receives a copy of an unreadable document
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Load with the failure kind visible to the caller
    ///
    /// Missing data is an empty collection; unparsable data is
    /// `Error::StorageCorrupt`.
    pub fn try_load(&self) -> Result<Vec<Message>> {
        match self.blobs.read_blob(&self.key)? {
            Some(raw) => Ok(self.decode(&raw)?.messages),
            None => Ok(Vec::new()),
        }
    }

    fn decode(&self, raw: &str) -> Result<Decoded> {
        let decoded = decode_messages(raw)?;
        if decoded.migrated_reactions > 0 {
            info!(
                key = %self.key,
                migrated = decoded.migrated_reactions,
                "Converted legacy reaction counts"
            );
        }
        for violation in invariants::check_messages(&decoded.messages) {
            warn!(key = %self.key, %violation, "Stored notes break an invariant");
        }
        Ok(decoded)
    }

    /// Keep the unreadable document so the next save cannot destroy it
    fn preserve_corrupt(&self, raw: &str) {
        let backup_key = self.backup_key();
        match self.blobs.write_blob(&backup_key, raw) {
            Ok(()) => warn!(key = %self.key, backup = %backup_key, "Saved corrupt notes aside"),
            Err(e) => warn!(key = %self.key, error = %e, "Could not back up corrupt notes"),
        }
    }
}

impl<B: BlobStore> MessagePersistence for BlobPersistence<B> {
    fn load(&self) -> Vec<Message> {
        let raw = match self.blobs.read_blob(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No stored notes, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read notes, starting empty");
                return Vec::new();
            }
        };

        match self.decode(&raw) {
            Ok(decoded) => {
                debug!(key = %self.key, count = decoded.messages.len(), "Loaded notes");
                decoded.messages
            }
            Err(e @ Error::StorageCorrupt(_)) => {
                warn!(key = %self.key, error = %e, "Stored notes unreadable, starting empty");
                self.preserve_corrupt(&raw);
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to decode notes, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, messages: &[Message]) -> Result<()> {
        let json = serde_json::to_string(messages)?;
        self.blobs.write_blob(&self.key, &json)?;
        debug!(key = %self.key, count = messages.len(), "Saved notes");
        Ok(())
    }
}
