use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::app::Config;
use crate::constants::FIRST_CONVERSATION_ID;
use crate::providers::ResponseProvider;
use crate::utils::SessionError;

use super::events::{Listener, SessionEvent, SubscriptionId};
use super::types::{Conversation, Message, Sender, Session};

/// Owns all conversations and orchestrates message appends plus deferred
/// reply generation.
///
/// All session mutation is serialized behind one lock; the triggering events
/// (user input, provider completion) may arrive from any task. Replies are
/// correlated by the conversation id captured at submission time, never by
/// which conversation is active when the provider resolves.
///
/// Cheap to clone; clones share the same session state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    session: RwLock<Session>,
    provider: Arc<dyn ResponseProvider>,
    config: Config,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_listener_id: AtomicU64,
    next_conversation_id: AtomicU64,
    /// In-flight reply count per conversation id
    pending: Mutex<HashMap<u64, usize>>,
}

impl SessionManager {
    /// Create a session with one seeded conversation, which is active
    pub fn new(provider: Arc<dyn ResponseProvider>, config: Config) -> Self {
        let seed = Conversation::seeded(
            FIRST_CONVERSATION_ID,
            config.session.conversation_name.clone(),
            &config.session.seed_greeting,
        );
        debug!(provider = provider.name(), "session initialized");

        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(Session {
                    conversations: vec![seed],
                    active_conversation_id: FIRST_CONVERSATION_ID,
                }),
                provider,
                config,
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(1),
                next_conversation_id: AtomicU64::new(FIRST_CONVERSATION_ID + 1),
                pending: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Read-only snapshot of the full session
    pub fn state(&self) -> Session {
        self.inner.session.read().clone()
    }

    /// Register a listener called synchronously after every state mutation.
    ///
    /// Listeners must not subscribe or unsubscribe from within a
    /// notification.
    pub fn subscribe(
        &self,
        listener: impl Fn(&Session, &SessionEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_listener_id.fetch_add(1, Ordering::SeqCst));
        self.inner.listeners.lock().push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Create a new conversation with a generated name and a seeded bot
    /// greeting, make it active, and return its id. Never fails.
    pub fn create_conversation(&self) -> u64 {
        let (snapshot, id) = {
            let mut session = self.inner.session.write();
            // Allocated under the write lock so id order matches insertion order
            let id = self
                .inner
                .next_conversation_id
                .fetch_add(1, Ordering::SeqCst);
            let name = format!("{} {}", self.inner.config.session.conversation_name, id);
            session.conversations.push(Conversation::seeded(
                id,
                name,
                &self.inner.config.session.briefing_greeting,
            ));
            session.active_conversation_id = id;
            (session.clone(), id)
        };

        debug!(conversation_id = id, "conversation created");
        self.notify(
            &snapshot,
            &SessionEvent::ConversationCreated { conversation_id: id },
        );
        id
    }

    /// Make an existing conversation the active one
    pub fn select_conversation(&self, conversation_id: u64) -> Result<(), SessionError> {
        let snapshot = {
            let mut session = self.inner.session.write();
            if session.conversation(conversation_id).is_none() {
                return Err(SessionError::ConversationNotFound(conversation_id));
            }
            session.active_conversation_id = conversation_id;
            session.clone()
        };

        self.notify(
            &snapshot,
            &SessionEvent::ConversationSelected { conversation_id },
        );
        Ok(())
    }

    /// Replace a conversation's messages with a single fresh seeded
    /// greeting, keeping its id and name
    pub fn reset_conversation(&self, conversation_id: u64) -> Result<(), SessionError> {
        let snapshot = {
            let mut session = self.inner.session.write();
            let conversation = session
                .conversation_mut(conversation_id)
                .ok_or(SessionError::ConversationNotFound(conversation_id))?;
            conversation.reseed(&self.inner.config.session.briefing_greeting);
            session.clone()
        };

        debug!(conversation_id, "conversation reset");
        self.notify(
            &snapshot,
            &SessionEvent::ConversationReset { conversation_id },
        );
        Ok(())
    }

    /// Append a user message and schedule a deferred bot reply.
    ///
    /// The user message is appended synchronously and returned; the reply is
    /// generated on a spawned task and lands in this conversation even if
    /// the active selection changes in the meantime. Must be called from
    /// within a Tokio runtime.
    pub fn submit_user_message(
        &self,
        conversation_id: u64,
        text: &str,
    ) -> Result<Message, SessionError> {
        self.submit_user_message_with_cancel(conversation_id, text, CancellationToken::new())
    }

    /// Like [`submit_user_message`](Self::submit_user_message), with a
    /// caller-supplied cancellation signal for the pending reply. If the
    /// token fires before the provider resolves, no bot message is appended.
    pub fn submit_user_message_with_cancel(
        &self,
        conversation_id: u64,
        text: &str,
        cancel: CancellationToken,
    ) -> Result<Message, SessionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let (snapshot, message, history) = {
            let mut session = self.inner.session.write();
            let conversation = session
                .conversation_mut(conversation_id)
                .ok_or(SessionError::ConversationNotFound(conversation_id))?;
            let message = conversation.append(Sender::User, trimmed.to_string());
            let history = conversation.messages.clone();
            (session.clone(), message, history)
        };

        // The pending reply is awaiting from the moment the user message
        // lands, so listeners of the append event already see it in flight.
        self.adjust_pending(conversation_id, 1);
        debug!(conversation_id, message_id = message.id, "reply awaiting");

        self.notify(
            &snapshot,
            &SessionEvent::MessageAppended {
                conversation_id,
                message_id: message.id,
                sender: Sender::User,
            },
        );

        let manager = self.clone();
        tokio::spawn(async move {
            manager.run_reply(conversation_id, history, cancel).await;
        });

        Ok(message)
    }

    /// Number of replies currently in flight for a conversation
    pub fn pending_replies(&self, conversation_id: u64) -> usize {
        self.inner
            .pending
            .lock()
            .get(&conversation_id)
            .copied()
            .unwrap_or(0)
    }

    /// Drive one pending reply to a terminal state: delivered, failed, or
    /// cancelled.
    async fn run_reply(
        &self,
        conversation_id: u64,
        history: Vec<Message>,
        cancel: CancellationToken,
    ) {
        // Race the provider against the cancellation signal so even a
        // provider that ignores its token cancels cleanly.
        let result = tokio::select! {
            _ = cancel.cancelled() => {
                self.adjust_pending(conversation_id, -1);
                debug!(conversation_id, "reply cancelled");
                let snapshot = self.state();
                self.notify(&snapshot, &SessionEvent::ReplyCancelled { conversation_id });
                return;
            }
            result = self.inner.provider.generate_reply(&history, &cancel) => result,
        };

        match result {
            Ok(text) => {
                let (snapshot, message_id) = {
                    let mut session = self.inner.session.write();
                    let Some(conversation) = session.conversation_mut(conversation_id) else {
                        // Conversations are never removed, so this only fires
                        // if the session was torn down underneath us.
                        warn!(conversation_id, "reply dropped, conversation missing");
                        self.adjust_pending(conversation_id, -1);
                        return;
                    };
                    let message = conversation.append(Sender::Bot, text);
                    (session.clone(), message.id)
                };

                self.adjust_pending(conversation_id, -1);
                debug!(conversation_id, message_id, "reply delivered");
                self.notify(
                    &snapshot,
                    &SessionEvent::MessageAppended {
                        conversation_id,
                        message_id,
                        sender: Sender::Bot,
                    },
                );
            }
            Err(source) => {
                let error = SessionError::Provider(source.to_string());
                self.adjust_pending(conversation_id, -1);
                warn!(conversation_id, %error, "reply failed");
                let snapshot = self.state();
                self.notify(
                    &snapshot,
                    &SessionEvent::ReplyFailed {
                        conversation_id,
                        error: error.to_string(),
                    },
                );
            }
        }
    }

    fn adjust_pending(&self, conversation_id: u64, delta: i64) {
        let mut pending = self.inner.pending.lock();
        let count = pending.entry(conversation_id).or_insert(0);
        *count = count.saturating_add_signed(delta as isize);
        if *count == 0 {
            pending.remove(&conversation_id);
        }
    }

    fn notify(&self, session: &Session, event: &SessionEvent) {
        let listeners = self.inner.listeners.lock();
        for (_, listener) in listeners.iter() {
            listener(session, event);
        }
    }
}
