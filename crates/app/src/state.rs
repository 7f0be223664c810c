//! Application state management

use std::path::Path;

use notes_core::{
    BlobPersistence, Database, Message, MessageStore, NotesConfig, Result, Sender, SystemClock,
};

use crate::commands::{Command, HELP};
use crate::render::{render_threads, sender_label};

pub type NotesStore = MessageStore<BlobPersistence<Database>, SystemClock>;

/// What the input loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Quit,
}

/// Main application state
pub struct AppState {
    store: NotesStore,
    sender: Sender,
}

impl AppState {
    /// Open the configured database, creating its directory if needed
    pub fn new(config: &NotesConfig) -> Result<Self> {
        let db_path = config.database_path()?;
        Self::open_at(&db_path, config)
    }

    pub fn open_at(db_path: &Path, config: &NotesConfig) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(db_path)?;
        let clock = SystemClock::new(config.display.timestamp_format.clone())?;
        let store = MessageStore::open(BlobPersistence::new(db, config.storage.key.clone()), clock);

        tracing::info!(
            path = %db_path.display(),
            notes = store.len(),
            "Notes loaded"
        );

        Ok(Self {
            store,
            sender: config.session.default_sender,
        })
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn messages(&self) -> &[Message] {
        self.store.list()
    }

    /// Apply one command
    ///
    /// Rejected intents come back as errors; the state is unchanged.
    pub fn handle(&mut self, command: Command) -> Result<Outcome> {
        let text = match command {
            Command::Send(text) => {
                let message = self.store.send(&text, self.sender, None)?;
                format!("sent #{} as {}", message.id(), message.sender())
            }
            Command::Reply { to, text } => {
                let message = self.store.send(&text, self.sender, Some(to))?;
                format!("sent #{} as {} in reply to #{}", message.id(), message.sender(), to)
            }
            Command::Edit { id, text } => {
                let message = self.store.edit(id, &text)?;
                format!("#{} now at {} edit(s)", id, message.edit_count())
            }
            Command::React { id, emoji } => {
                let message = self.store.toggle_reaction(id, &emoji, self.sender)?;
                let state = if message.reactions().contains(&emoji, self.sender.into()) {
                    "added"
                } else {
                    "removed"
                };
                format!("{} {} on #{}", state, emoji, id)
            }
            Command::Delete(id) => {
                self.store.delete(id)?;
                format!("deleted #{}", id)
            }
            Command::SendAs(choice) => {
                self.sender = choice.unwrap_or_else(|| self.sender.toggled());
                format!("Send as: {}", sender_label(self.sender))
            }
            Command::List => render_threads(self.store.list(), self.sender),
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
            Command::Empty => String::new(),
        };
        Ok(Outcome::Print(text))
    }
}
