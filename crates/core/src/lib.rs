//! Notes Core Library
//!
//! Threaded notes engine: the message store, reply-thread reconstruction and
//! persistence of the message collection.

pub mod clock;
pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod storage;
pub mod store;
pub mod thread;

pub use clock::{Clock, SystemClock};
pub use config::NotesConfig;
pub use error::{Error, Result};
pub use models::*;
pub use storage::{
    BlobPersistence, BlobStore, Database, MemoryBlobStore, MessagePersistence,
    DEFAULT_STORAGE_KEY,
};
pub use store::MessageStore;
pub use thread::{
    build_forest, flatten, resolve_reply_preview, summarize, MessageSummary, ReactionSummary,
    ThreadRow, TreeNode, REPLY_NOT_FOUND,
};
