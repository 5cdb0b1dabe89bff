use crate::entity::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Callers are expected to pass already-trimmed, non-empty text.
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: format!("m-{}", Uuid::new_v4().simple()),
            sender_id: sender_id.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A two-party thread about one ride. Participants are keyed by identity id
/// and fixed at creation; messages keep their append order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub ride_id: String,
    pub participants: BTreeMap<String, Identity>,
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(ride_id: impl Into<String>, a: Identity, b: Identity) -> Self {
        let mut participants = BTreeMap::new();
        participants.insert(a.id.clone(), a);
        participants.insert(b.id.clone(), b);
        Self {
            id: format!("c-{}", Uuid::new_v4().simple()),
            ride_id: ride_id.into(),
            participants,
            messages: Vec::new(),
        }
    }

    pub fn involves(&self, identity_id: &str) -> bool {
        self.participants.contains_key(identity_id)
    }

    /// The participant who is not `viewer_id`, if one can be resolved.
    pub fn other_participant(&self, viewer_id: &str) -> Option<&Identity> {
        self.participants.values().find(|p| p.id != viewer_id)
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}
