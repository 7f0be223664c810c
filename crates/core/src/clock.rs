//! Time source for message ids and display timestamps

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, Utc};

use crate::error::{Error, Result};

/// Default display format, e.g. "9:15:02 AM"
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-I:%M:%S %p";

/// Clock read by the message store when a message is sent
pub trait Clock {
    /// Wall-clock milliseconds since the Unix epoch, the seed for new ids
    fn now_millis(&self) -> i64;

    /// Human-readable time captured into `Message::timestamp`
    fn display_timestamp(&self) -> String;
}

/// Clock backed by the system time, formatting in the local time zone
#[derive(Debug, Clone)]
pub struct SystemClock {
    timestamp_format: String,
}

impl SystemClock {
    pub fn new(timestamp_format: impl Into<String>) -> Result<Self> {
        let timestamp_format = timestamp_format.into();
        validate_timestamp_format(&timestamp_format)?;
        Ok(Self { timestamp_format })
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn display_timestamp(&self) -> String {
        Local::now().format(&self.timestamp_format).to_string()
    }
}

/// Reject strftime patterns chrono cannot render
pub fn validate_timestamp_format(format: &str) -> Result<()> {
    if format.is_empty() {
        return Err(Error::Config("timestamp format is empty".to_string()));
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::Config(format!(
            "invalid timestamp format '{}'",
            format
        )));
    }
    Ok(())
}
