//! Notes configuration
//!
//! Read from `notes.toml`. Every field has a default, so a missing file or a
//! partial file is fine:
//!
//! ```toml
//! [storage]
//! path = "/home/me/notes.db"
//! key = "notes.messages"
//!
//! [display]
//! timestamp_format = "%H:%M"
//!
//! [session]
//! default_sender = "other"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{validate_timestamp_format, DEFAULT_TIMESTAMP_FORMAT};
use crate::error::{Error, Result};
use crate::models::Sender;
use crate::storage::DEFAULT_STORAGE_KEY;

/// File name looked up in the platform config directory
pub const CONFIG_FILE_NAME: &str = "notes.toml";

/// Database file name used when no storage path is configured
pub const DATABASE_FILE_NAME: &str = "notes.db";

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "threaded-notes";
const APPLICATION: &str = "notes";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    pub storage: StorageConfig,
    pub display: DisplayConfig,
    pub session: SessionConfig,
}

/// Where the message document lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; the platform data directory when unset
    pub path: Option<PathBuf>,
    /// Key the message document is stored under
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// chrono strftime pattern for message timestamps, local time
    pub timestamp_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Identity selected when the app starts
    pub default_sender: Sender,
}

impl NotesConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            return Err(Error::Config("storage key is empty".to_string()));
        }
        validate_timestamp_format(&self.display.timestamp_format)
    }

    /// Database file to open
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Ok(project_dirs()?.data_dir().join(DATABASE_FILE_NAME)),
        }
    }

    /// Default location of `notes.toml`
    pub fn default_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine data directory",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = NotesConfig::from_toml_str("").unwrap();
        assert_eq!(config, NotesConfig::default());
        assert_eq!(config.storage.key, "notes.messages");
        assert_eq!(config.display.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(config.session.default_sender, Sender::Me);
    }

    #[test]
    fn test_full_document() {
        let config = NotesConfig::from_toml_str(
            r#"
            [storage]
            path = "/tmp/study/notes.db"
            key = "study.notes"

            [display]
            timestamp_format = "%H:%M"

            [session]
            default_sender = "other"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/study/notes.db")
        );
        assert_eq!(config.storage.key, "study.notes");
        assert_eq!(config.display.timestamp_format, "%H:%M");
        assert_eq!(config.session.default_sender, Sender::Other);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = NotesConfig::from_toml_str("[storage]\nkey = \"k\"\n").unwrap();
        assert_eq!(config.storage.key, "k");
        assert!(config.storage.path.is_none());
        assert_eq!(config.display, DisplayConfig::default());
    }

    #[test]
    fn test_invalid_documents_rejected() {
        for content in [
            "[storage]\nkey = \"\"\n",
            "[display]\ntimestamp_format = \"%Q\"\n",
            "[session]\ndefault_sender = \"legacy\"\n",
            "not = [valid",
        ] {
            assert!(
                matches!(NotesConfig::from_toml_str(content), Err(Error::Config(_))),
                "expected config error for {:?}",
                content
            );
        }
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotesConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, NotesConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[session]\ndefault_sender = \"other\"\n").unwrap();

        let config = NotesConfig::load(&path).unwrap();
        assert_eq!(config.session.default_sender, Sender::Other);
    }

    #[test]
    fn test_default_paths_are_the_notes_project_dirs() {
        // No home directory means no platform paths to check
        let dirs = match project_dirs() {
            Ok(dirs) => dirs,
            Err(_) => return,
        };

        assert_eq!(
            NotesConfig::default().database_path().unwrap(),
            dirs.data_dir().join(DATABASE_FILE_NAME)
        );
        assert_eq!(
            NotesConfig::default_path().unwrap(),
            dirs.config_dir().join(CONFIG_FILE_NAME)
        );
        let project = dirs.project_path().to_string_lossy().to_lowercase();
        assert!(project.contains(APPLICATION));
        assert!(!project.contains("onyx"));
    }
}
