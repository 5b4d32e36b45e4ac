use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::FIRST_MESSAGE_ID;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub created_at: DateTime<Local>,
}

impl Message {
    fn new(id: u64, sender: Sender, text: String) -> Self {
        Self {
            id,
            text,
            sender,
            created_at: Local::now(),
        }
    }
}

/// A named, ordered thread of messages
///
/// Messages are append-only and chronological. Every conversation carries at
/// least one message (the seeded bot greeting) from the moment it exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: u64,
    pub name: String,
    pub messages: Vec<Message>,
    /// Monotonic id allocator for this conversation. Not derived from
    /// `messages.len()` so interleaved appends can never collide.
    #[serde(skip)]
    pub(crate) next_message_id: u64,
}

impl Conversation {
    /// Create a conversation holding a single seeded bot greeting
    pub(crate) fn seeded(id: u64, name: String, greeting: &str) -> Self {
        let mut conversation = Self {
            id,
            name,
            messages: Vec::new(),
            next_message_id: FIRST_MESSAGE_ID,
        };
        conversation.append(Sender::Bot, greeting.to_string());
        conversation
    }

    /// Append a message with the next id in this conversation
    pub(crate) fn append(&mut self, sender: Sender, text: String) -> Message {
        let message = Message::new(self.next_message_id, sender, text);
        self.next_message_id += 1;
        self.messages.push(message.clone());
        message
    }

    /// Replace all messages with a single fresh seeded greeting,
    /// keeping id and name intact
    pub(crate) fn reseed(&mut self, greeting: &str) {
        self.messages.clear();
        self.next_message_id = FIRST_MESSAGE_ID;
        self.append(Sender::Bot, greeting.to_string());
    }

    /// The most recent message. Conversations are never empty.
    pub fn last_message(&self) -> &Message {
        self.messages
            .last()
            .unwrap_or_else(|| unreachable!("conversation holds at least the seeded greeting"))
    }
}

/// The full set of conversations plus which one is active
///
/// `SessionManager::state` hands out deep clones of this; callers never see
/// the live session behind the lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Conversations in creation order
    pub conversations: Vec<Conversation>,
    /// Always references a conversation present in `conversations`
    pub active_conversation_id: u64,
}

impl Session {
    /// Look up a conversation by id
    pub fn conversation(&self, id: u64) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// The currently active conversation
    pub fn active_conversation(&self) -> &Conversation {
        self.conversation(self.active_conversation_id)
            .unwrap_or_else(|| unreachable!("active id always references a known conversation"))
    }

    pub(crate) fn conversation_mut(&mut self, id: u64) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seeded_conversation_has_one_bot_message() {
        let conversation = Conversation::seeded(1, "New Chat".to_string(), "hello");

        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].id, 1);
        assert_eq!(conversation.messages[0].sender, Sender::Bot);
        assert_eq!(conversation.messages[0].text, "hello");
    }

    #[test]
    fn test_append_assigns_increasing_ids() {
        let mut conversation = Conversation::seeded(1, "New Chat".to_string(), "hello");
        conversation.append(Sender::User, "first".to_string());
        conversation.append(Sender::Bot, "second".to_string());

        let ids: Vec<u64> = conversation.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_reseed_restarts_ids_and_keeps_identity() {
        let mut conversation = Conversation::seeded(7, "New Chat 7".to_string(), "hello");
        conversation.append(Sender::User, "status".to_string());

        conversation.reseed("fresh start");

        assert_eq!(conversation.id, 7);
        assert_eq!(conversation.name, "New Chat 7");
        assert_eq!(conversation.messages.len(), 1);
        assert_eq!(conversation.messages[0].id, 1);
        assert_eq!(conversation.messages[0].text, "fresh start");
    }
}
