//! Message store
//!
//! Owns the flat, insertion-ordered message collection and is the only place
//! messages are created or changed. Every mutation is written through to the
//! persistence layer before it becomes visible: the change is applied to a
//! working copy, the copy is saved, and only then does it replace the live
//! collection. A failed save therefore leaves nothing changed.

use tracing::{debug, info, instrument};

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::invariants;
use crate::models::{Message, MessageId, Reactor, Sender};
use crate::storage::MessagePersistence;

/// Issues strictly increasing ids seeded from the wall clock
#[derive(Debug, Clone, Copy, Default)]
struct IdSequence {
    last: Option<i64>,
}

impl IdSequence {
    fn after(last: Option<MessageId>) -> Self {
        Self {
            last: last.map(|id| id.0),
        }
    }

    /// Clock milliseconds, bumped past the previous id on collision or when
    /// the clock went backwards
    ///
    /// Fails without advancing once the previous id is `i64::MAX`.
    fn next(&mut self, now_millis: i64) -> Result<MessageId> {
        let id = match self.last {
            Some(last) if now_millis <= last => last
                .checked_add(1)
                .ok_or(Error::IdsExhausted(MessageId(last)))?,
            _ => now_millis,
        };
        self.last = Some(id);
        Ok(MessageId(id))
    }
}

pub struct MessageStore<P, C = SystemClock> {
    messages: Vec<Message>,
    persistence: P,
    clock: C,
    ids: IdSequence,
}

impl<P: MessagePersistence, C: Clock> MessageStore<P, C> {
    /// Load the stored collection and take ownership of it
    #[instrument(skip_all)]
    pub fn open(persistence: P, clock: C) -> Self {
        let messages = persistence.load();
        let ids = IdSequence::after(messages.iter().map(Message::id).max());
        info!(count = messages.len(), "Message store opened");
        Self {
            messages,
            persistence,
            clock,
            ids,
        }
    }

    /// Post a new message, optionally as a reply
    ///
    /// Blank text is rejected with `Error::Validation`; a reply to an id that
    /// is not in the collection is rejected with `Error::NotFound`.
    pub fn send(
        &mut self,
        text: &str,
        sender: Sender,
        reply_to: Option<MessageId>,
    ) -> Result<Message> {
        if text.trim().is_empty() {
            debug!("Rejected blank message");
            return Err(Error::Validation("message text is empty".to_string()));
        }
        if let Some(parent) = reply_to {
            self.position(parent)?;
        }

        let id = self.ids.next(self.clock.now_millis())?;
        let message = Message::new(
            id,
            text.to_string(),
            sender,
            self.clock.display_timestamp(),
            reply_to,
        );
        invariants::assert_new_message(&message, &self.messages);

        let mut next = self.messages.clone();
        next.push(message.clone());
        self.commit(next)?;

        debug!(%id, %sender, reply_to = ?reply_to.map(|r| r.0), "Message sent");
        Ok(message)
    }

    /// Replace a message's text
    ///
    /// Identical text is accepted and changes nothing, including the edit
    /// count; anything else bumps the edit count by one.
    pub fn edit(&mut self, id: MessageId, new_text: &str) -> Result<Message> {
        let index = self.position(id)?;
        let current = &self.messages[index];
        if current.text == new_text {
            debug!(%id, "Edit left text unchanged");
            return Ok(current.clone());
        }

        let mut next = self.messages.clone();
        let edited = &mut next[index];
        edited.text = new_text.to_string();
        edited.edit_count += 1;
        invariants::assert_edit_monotonic(&self.messages[index], edited);
        let edited = edited.clone();
        self.commit(next)?;

        debug!(%id, edit_count = edited.edit_count, "Message edited");
        Ok(edited)
    }

    /// Add or remove `sender`'s `emoji` reaction on a message
    pub fn toggle_reaction(
        &mut self,
        id: MessageId,
        emoji: &str,
        sender: Sender,
    ) -> Result<Message> {
        let index = self.position(id)?;
        if emoji.trim().is_empty() {
            return Err(Error::Validation("reaction emoji is empty".to_string()));
        }

        let mut next = self.messages.clone();
        let target = &mut next[index];
        let added = target.reactions.toggle(emoji, Reactor::from(sender));
        let updated = target.clone();
        self.commit(next)?;

        debug!(%id, emoji, %sender, added, "Reaction toggled");
        Ok(updated)
    }

    /// Remove one message; its replies are kept and become orphans
    pub fn delete(&mut self, id: MessageId) -> Result<()> {
        let index = self.position(id)?;

        let mut next = self.messages.clone();
        next.remove(index);
        self.commit(next)?;

        let orphaned = self
            .messages
            .iter()
            .filter(|m| m.reply_to == Some(id))
            .count();
        debug!(%id, orphaned, "Message deleted");
        Ok(())
    }

    /// Messages in insertion order
    pub fn list(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn position(&self, id: MessageId) -> Result<usize> {
        self.messages
            .iter()
            .position(|m| m.id == id)
            .ok_or(Error::NotFound(id))
    }

    fn commit(&mut self, next: Vec<Message>) -> Result<()> {
        self.persistence.save(&next)?;
        self.messages = next;
        Ok(())
    }
}
