use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::app::ProviderSettings;
use crate::constants::{DEFAULT_CANNED_REPLY, DEFAULT_REPLY_DELAY_MS};
use crate::session::Message;

use super::traits::ResponseProvider;

/// Stub provider that returns a fixed acknowledgment after a fixed delay.
///
/// Stands in for a real model client during development and in tests. Both
/// the delay and the reply text are configuration, not behavior; a real
/// generator replaces this without touching the session layer.
pub struct CannedProvider {
    reply_text: String,
    delay: Duration,
}

impl CannedProvider {
    pub fn new(reply_text: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            reply_text: reply_text.into(),
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Build from the `[provider]` section of the loaded config
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new(settings.canned_reply.clone(), settings.delay_ms)
    }
}

impl Default for CannedProvider {
    fn default() -> Self {
        Self::new(DEFAULT_CANNED_REPLY, DEFAULT_REPLY_DELAY_MS)
    }
}

#[async_trait]
impl ResponseProvider for CannedProvider {
    async fn generate_reply(
        &self,
        _history: &[Message],
        cancel: &CancellationToken,
    ) -> Result<String> {
        tokio::select! {
            _ = cancel.cancelled() => Err(anyhow::anyhow!("reply generation cancelled")),
            _ = tokio::time::sleep(self.delay) => Ok(self.reply_text.clone()),
        }
    }

    fn name(&self) -> &str {
        "canned"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test(start_paused = true)]
    async fn test_replies_with_configured_text_after_delay() {
        let provider = CannedProvider::new("copy that", 250);
        let started = tokio::time::Instant::now();

        let reply = provider
            .generate_reply(&[], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply, "copy that");
        assert_eq!(started.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_the_reply() {
        let provider = CannedProvider::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = provider.generate_reply(&[], &cancel).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_match_documented_configuration() {
        let provider = CannedProvider::default();
        assert_eq!(provider.reply_text, DEFAULT_CANNED_REPLY);
        assert_eq!(provider.delay, Duration::from_millis(DEFAULT_REPLY_DELAY_MS));
    }

    #[test]
    fn test_from_settings_picks_up_config() {
        let settings = ProviderSettings {
            delay_ms: 10,
            canned_reply: "ack".to_string(),
        };

        let provider = CannedProvider::from_settings(&settings);
        assert_eq!(provider.reply_text, "ack");
        assert_eq!(provider.delay, Duration::from_millis(10));
    }
}
