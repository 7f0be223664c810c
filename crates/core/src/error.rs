//! Error types for Notes Core

use thiserror::Error;

use crate::models::MessageId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Message not found: {0}")]
    NotFound(MessageId),

    #[error("No message id left after {0}")]
    IdsExhausted(MessageId),

    #[error("Stored notes are corrupt: {0}")]
    StorageCorrupt(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
