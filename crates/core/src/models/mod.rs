//! Data models for the notes thread

mod identity;
mod message;
mod reactions;

pub use identity::*;
pub use message::*;
pub use reactions::*;
