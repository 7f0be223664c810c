//! Author and reactor identities

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The role the local actor is posting as
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[default]
    Me,
    Other,
}

impl Sender {
    /// The identity on the other side of the "send as" toggle
    pub fn toggled(self) -> Self {
        match self {
            Sender::Me => Sender::Other,
            Sender::Other => Sender::Me,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sender::Me => "me",
            Sender::Other => "other",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "me" => Ok(Sender::Me),
            "other" => Ok(Sender::Other),
            other => Err(format!("unknown sender '{}', expected 'me' or 'other'", other)),
        }
    }
}

/// An identity recorded in a reaction set
///
/// `Legacy` stands in for reactors whose identity was lost when an older
/// store only kept a per-emoji count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reactor {
    Me,
    Other,
    Legacy,
}

impl Reactor {
    pub fn as_str(self) -> &'static str {
        match self {
            Reactor::Me => "me",
            Reactor::Other => "other",
            Reactor::Legacy => "legacy",
        }
    }
}

impl From<Sender> for Reactor {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::Me => Reactor::Me,
            Sender::Other => Reactor::Other,
        }
    }
}

impl fmt::Display for Reactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
