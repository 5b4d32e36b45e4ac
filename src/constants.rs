/// Constants module to avoid magic strings and numbers in the codebase

// Response provider defaults
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1000;
pub const DEFAULT_CANNED_REPLY: &str =
    "Processing your request, Agent. Stand by for data analysis.";

// Seed greetings
pub const STARTUP_GREETING: &str =
    "Greetings, Agent. KAY/0 AI online. What intel do you require?";
pub const BRIEFING_GREETING: &str = "New mission briefing. What's your status, Agent?";

// Conversation naming
pub const DEFAULT_CONVERSATION_NAME: &str = "New Chat";

// Id allocation starts here, for conversations within a session and
// for messages within a conversation
pub const FIRST_CONVERSATION_ID: u64 = 1;
pub const FIRST_MESSAGE_ID: u64 = 1;
