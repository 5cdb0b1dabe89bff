//! The set of all conversations in the session.
//!
//! There is at most one conversation per ride and pair of participants.
//! Lookups are linear scans; the directory only ever holds one session's
//! worth of threads. Clones share storage until the next mutation.

use crate::chat::{ChatMessage, Conversation};
use crate::entity::Identity;
use crate::error::AppError;
use crate::ride::Ride;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ConversationDirectory {
    conversations: Arc<Vec<Conversation>>,
}

impl ConversationDirectory {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations: Arc::new(conversations),
        }
    }

    /// Returns the conversation `requester` already has with the driver
    /// about `ride`, or opens a new, empty one.
    ///
    /// A driver cannot open a conversation about their own ride.
    pub fn find_or_create(
        &mut self,
        ride: &Ride,
        requester: &Identity,
    ) -> Result<Conversation, AppError> {
        if requester.id == ride.driver.id {
            return Err(AppError::InvalidParticipant);
        }

        if let Some(existing) = self.conversations.iter().find(|c| {
            c.ride_id == ride.id && c.involves(&requester.id) && c.involves(&ride.driver.id)
        }) {
            debug!(conversation_id = %existing.id, ride_id = %ride.id, "Reusing conversation");
            return Ok(existing.clone());
        }

        let conversation = Conversation::new(ride.id.clone(), requester.clone(), ride.driver.clone());
        info!(
            conversation_id = %conversation.id,
            ride_id = %ride.id,
            requester = %requester,
            driver = %ride.driver,
            "Conversation started"
        );

        Arc::make_mut(&mut self.conversations).push(conversation.clone());
        Ok(conversation)
    }

    /// Appends `text` from `sender` and returns the updated conversation.
    ///
    /// Whitespace-only text leaves the conversation untouched and yields
    /// `Ok(None)`.
    pub fn append_message(
        &mut self,
        conversation_id: &str,
        sender: &Identity,
        text: &str,
    ) -> Result<Option<Conversation>, AppError> {
        let text = text.trim();
        let position = self
            .conversations
            .iter()
            .position(|c| c.id == conversation_id)
            .ok_or_else(|| AppError::ConversationNotFound(conversation_id.to_string()))?;

        if text.is_empty() {
            debug!(conversation_id, "Ignoring empty message");
            return Ok(None);
        }

        let message = ChatMessage::new(sender.id.clone(), text);
        info!(
            conversation_id,
            message_id = %message.id,
            sender = %sender,
            "Message sent"
        );

        let conversations = Arc::make_mut(&mut self.conversations);
        let conversation = &mut conversations[position];
        conversation.messages.push(message);
        Ok(Some(conversation.clone()))
    }

    pub fn get(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == conversation_id)
    }

    /// Conversations `identity_id` takes part in, oldest first.
    pub fn conversations_for<'a>(
        &'a self,
        identity_id: &'a str,
    ) -> impl Iterator<Item = &'a Conversation> + 'a {
        self.conversations.iter().filter(move |c| c.involves(identity_id))
    }

    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
