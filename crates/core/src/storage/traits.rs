//! Storage traits
//!
//! `BlobStore` is the raw key-value medium; `MessagePersistence` is what the
//! message store talks to. Splitting them keeps the message store unaware of
//! SQLite and lets tests swap either layer.

use crate::error::Result;
use crate::models::Message;

/// Key-value storage of whole text documents
pub trait BlobStore {
    /// Read the document stored under `key`, `None` if nothing was stored
    fn read_blob(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document stored under `key`
    fn write_blob(&self, key: &str, value: &str) -> Result<()>;
}

/// Durable round-trip of the full message collection
pub trait MessagePersistence {
    /// Load the collection at startup
    ///
    /// Never fails: missing or unreadable data yields an empty collection and
    /// the problem is reported through the log.
    fn load(&self) -> Vec<Message>;

    /// Overwrite the stored collection with `messages`
    fn save(&self, messages: &[Message]) -> Result<()>;
}

impl<T: BlobStore + ?Sized> BlobStore for &T {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        (**self).read_blob(key)
    }

    fn write_blob(&self, key: &str, value: &str) -> Result<()> {
        (**self).write_blob(key, value)
    }
}
