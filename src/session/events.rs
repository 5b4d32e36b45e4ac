use serde::Serialize;

use super::types::{Sender, Session};

/// State-change notification delivered to subscribers
///
/// Every mutation of session state produces exactly one event. Reply
/// failures and cancellations are attached to the originating conversation
/// id so they never surface in unrelated call sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionEvent {
    ConversationCreated {
        conversation_id: u64,
    },
    ConversationSelected {
        conversation_id: u64,
    },
    ConversationReset {
        conversation_id: u64,
    },
    MessageAppended {
        conversation_id: u64,
        message_id: u64,
        sender: Sender,
    },
    ReplyFailed {
        conversation_id: u64,
        error: String,
    },
    ReplyCancelled {
        conversation_id: u64,
    },
}

/// Handle returned by `SessionManager::subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Callback invoked synchronously after each state mutation with the new
/// session snapshot and the event that caused it
pub(crate) type Listener = Box<dyn Fn(&Session, &SessionEvent) + Send + Sync>;
