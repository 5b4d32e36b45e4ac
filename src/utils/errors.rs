use thiserror::Error;

/// Main error type for session operations
///
/// Every failure either prevents a mutation entirely (`EmptyMessage`,
/// `ConversationNotFound`) or produces one well-defined state transition
/// surfaced on the subscription channel (`Provider`).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("message text is empty")]
    EmptyMessage,

    #[error("unknown conversation: {0}")]
    ConversationNotFound(u64),

    #[error("provider error: {0}")]
    Provider(String),
}
