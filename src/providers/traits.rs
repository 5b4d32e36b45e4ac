use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::session::Message;

/// Core trait that all response backends must implement
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Generate a bot reply from the full history of one conversation.
    ///
    /// Invoked once per submitted user message, on a task that never blocks
    /// the submitting caller. `cancel` is a caller-supplied signal;
    /// implementations doing real work (network calls, local inference)
    /// should abort when it fires rather than waste the effort.
    async fn generate_reply(
        &self,
        history: &[Message],
        cancel: &CancellationToken,
    ) -> Result<String>;

    /// Provider name, for logging
    fn name(&self) -> &str;
}
