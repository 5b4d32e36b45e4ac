pub mod app;
pub mod constants;
pub mod providers;
pub mod session;
pub mod utils;

pub use app::{load_config, Config};
pub use providers::{CannedProvider, ResponseProvider};
pub use session::{
    Conversation, Message, Sender, Session, SessionEvent, SessionManager, SubscriptionId,
};
pub use utils::SessionError;
