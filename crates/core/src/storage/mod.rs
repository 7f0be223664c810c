//! Storage layer for notes
//!
//! The durable medium is a single SQLite file holding a key-value table; the
//! message collection lives in it as one JSON document.

mod kv;
mod memory;
mod migrations;
mod parse;
mod persistence;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;

use crate::error::Result;

pub use kv::KvStore;
pub use memory::MemoryBlobStore;
pub use parse::{decode_messages, Decoded};
pub use persistence::{BlobPersistence, DEFAULT_STORAGE_KEY};
pub use traits::{BlobStore, MessagePersistence};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        migrations::applied_version(&self.conn).unwrap_or(0)
    }

    /// Get the key-value table
    pub fn kv(&self) -> KvStore<'_> {
        KvStore::new(&self.conn)
    }
}

impl BlobStore for Database {
    fn read_blob(&self, key: &str) -> Result<Option<String>> {
        self.kv().get(key)
    }

    fn write_blob(&self, key: &str, value: &str) -> Result<()> {
        self.kv().put(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_is_migrated() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version() >= 1);
    }

    #[test]
    fn test_blob_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.db");

        {
            let db = Database::open(&path).unwrap();
            db.write_blob("notes.messages", "[]").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(
            db.read_blob("notes.messages").unwrap(),
            Some("[]".to_string())
        );
    }
}
