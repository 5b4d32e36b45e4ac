// Gateway module for session - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod events;
mod manager;
mod types;

// Public re-exports - the ONLY way to access session functionality
pub use events::{SessionEvent, SubscriptionId};
pub use manager::SessionManager;
pub use types::{Conversation, Message, Sender, Session};
