//! Conversation store
//!
//! Owns every conversation, the active selection and the send lifecycle.
//! State changes are applied in memory first and then written through the
//! persistence adapter; persistence never fails a chat operation.
//!
//! All operations take `&self`. The state mutex is only held for
//! synchronous sections and never across the provider call, so a store
//! shared behind an `Arc` stays responsive while a send is outstanding.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::types::{Conversation, Message, Notice, StoreState};
use crate::config::ChatConfig;
use crate::error::{ChatdeskError, Result};
use crate::helpers;
use crate::providers::{ProviderReply, ResponseProvider};
use crate::storage::ConversationPersistence;

/// Conversation behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Longest title in characters before it is cut
    pub title_max_length: usize,
    /// Suffix appended to a cut title
    pub title_ellipsis: String,
    /// Title of a conversation without messages
    pub placeholder_title: String,
    /// Deadline for one provider reply; `None` waits forever
    pub response_timeout: Option<Duration>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        ChatSettings::from(&ChatConfig::default())
    }
}

impl From<&ChatConfig> for ChatSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            title_max_length: config.title_max_length,
            title_ellipsis: config.title_ellipsis.clone(),
            placeholder_title: config.placeholder_title.clone(),
            response_timeout: (config.response_timeout_seconds > 0)
                .then(|| Duration::from_secs(config.response_timeout_seconds)),
        }
    }
}

/// Why a send was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Content was empty after trimming
    EmptyContent,
    /// Another send is still waiting for its reply
    AlreadySending,
}

/// Result of [`ConversationStore::send_user_message`]
///
/// Informational only; the store state is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was appended and the provider was not called
    Ignored(IgnoreReason),
    /// The assistant reply was appended to the originating conversation
    Delivered {
        conversation_id: String,
        message_id: String,
    },
    /// The provider failed; the error is recorded as the last error
    Failed {
        conversation_id: String,
        error: String,
    },
    /// The reply arrived after its conversation was removed, or after
    /// every chat was cleared
    Discarded { conversation_id: String },
}

#[derive(Debug, Default)]
struct Inner {
    state: StoreState,
    notices: Vec<Notice>,
    initialized: bool,
    /// Ticket of the send currently holding the in-flight flag
    current_send: Option<u64>,
    next_send: u64,
}

impl Inner {
    fn create_conversation(&mut self, placeholder: &str) -> String {
        let conversation = Conversation::new(placeholder);
        let id = conversation.id().to_string();
        self.state.conversations.insert(0, conversation);
        self.state.active_conversation_id = Some(id.clone());
        id
    }

    fn finish_send(&mut self, ticket: u64) -> bool {
        if self.current_send == Some(ticket) {
            self.current_send = None;
            self.state.is_sending = false;
            true
        } else {
            false
        }
    }
}

/// Conversation state manager
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chatdesk::chat::{ChatSettings, ConversationStore};
/// use chatdesk::config::DemoConfig;
/// use chatdesk::providers::DemoProvider;
/// use chatdesk::storage::{ConversationPersistence, MemoryStore};
///
/// let store = ConversationStore::new(
///     ConversationPersistence::new(Arc::new(MemoryStore::new())),
///     Arc::new(DemoProvider::new(DemoConfig::default())),
///     ChatSettings::default(),
/// );
/// store.initialize();
/// let id = store.create_conversation();
/// assert_eq!(store.active_conversation_id().as_deref(), Some(id.as_str()));
/// ```
pub struct ConversationStore {
    inner: Mutex<Inner>,
    persistence: ConversationPersistence,
    provider: Arc<dyn ResponseProvider>,
    settings: ChatSettings,
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("provider", &self.provider.name())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ConversationStore {
    /// Creates an empty store
    ///
    /// Call [`initialize`](Self::initialize) to load saved conversations.
    pub fn new(
        persistence: ConversationPersistence,
        provider: Arc<dyn ResponseProvider>,
        settings: ChatSettings,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            persistence,
            provider,
            settings,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn save(&self, inner: &Inner) {
        self.persistence.save(&inner.state.conversations);
    }

    /// Loads saved conversations and selects the first one
    ///
    /// Only the first call loads; later calls return 0. Conversations created
    /// before initialization stay in front of the loaded ones.
    ///
    /// # Returns
    ///
    /// Number of conversations loaded
    pub fn initialize(&self) -> usize {
        let mut inner = self.lock();
        if inner.initialized {
            return 0;
        }
        inner.initialized = true;

        let loaded = self.persistence.load();
        let count = loaded.len();
        if count == 0 {
            debug!("No saved conversations");
            return 0;
        }

        let had_unsaved = !inner.state.conversations.is_empty();
        inner.state.conversations.extend(loaded);
        if inner.state.active_conversation_id.is_none() {
            inner.state.active_conversation_id =
                inner.state.conversations.first().map(|c| c.id().to_string());
        }
        if had_unsaved {
            self.save(&inner);
        }

        info!(count, "Loaded saved conversations");
        count
    }

    /// Creates an empty conversation at the front of the list and selects it
    ///
    /// # Returns
    ///
    /// The new conversation id
    pub fn create_conversation(&self) -> String {
        let mut inner = self.lock();
        let id = inner.create_conversation(&self.settings.placeholder_title);
        self.save(&inner);
        debug!(conversation_id = %id, "Created conversation");
        id
    }

    /// Selects an existing conversation
    ///
    /// # Errors
    ///
    /// Returns `ChatdeskError::ConversationNotFound` for an unknown id; the
    /// selection is left unchanged.
    pub fn set_active_conversation(&self, id: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.state.conversation(id).is_none() {
            return Err(ChatdeskError::ConversationNotFound(id.to_string()).into());
        }
        inner.state.active_conversation_id = Some(id.to_string());
        debug!(conversation_id = %id, "Switched conversation");
        Ok(())
    }

    /// Sends a user message and waits for the assistant reply
    ///
    /// See [`send_user_message_with_cancel`](Self::send_user_message_with_cancel).
    pub async fn send_user_message(&self, content: &str) -> SendOutcome {
        self.send_user_message_with_cancel(content, CancellationToken::new())
            .await
    }

    /// Sends a user message, waiting for the reply until it arrives, the
    /// configured deadline passes or `cancel` fires
    ///
    /// Empty content, or a send while another is in flight, is ignored. With
    /// no active conversation a new one is created. The reply is appended to
    /// the conversation that was active when the send started, even if the
    /// selection changed meanwhile.
    pub async fn send_user_message_with_cancel(
        &self,
        content: &str,
        cancel: CancellationToken,
    ) -> SendOutcome {
        let content = content.trim();
        if content.is_empty() {
            return SendOutcome::Ignored(IgnoreReason::EmptyContent);
        }

        let (ticket, conversation_id, history) = {
            let mut inner = self.lock();
            if inner.state.is_sending {
                debug!("Send ignored: another send is in flight");
                return SendOutcome::Ignored(IgnoreReason::AlreadySending);
            }

            let active = inner
                .state
                .active_conversation()
                .map(|c| c.id().to_string());
            let conversation_id = match active {
                Some(id) => id,
                None => inner.create_conversation(&self.settings.placeholder_title),
            };

            let title = helpers::generate_title(
                content,
                self.settings.title_max_length,
                &self.settings.title_ellipsis,
            );
            let history = match inner.state.conversation_mut(&conversation_id) {
                Some(conversation) => {
                    if conversation.is_empty() {
                        conversation.set_title(title);
                    }
                    conversation.push(Message::user(content));
                    conversation.messages().to_vec()
                }
                None => Vec::new(),
            };

            let ticket = inner.next_send;
            inner.next_send += 1;
            inner.current_send = Some(ticket);
            inner.state.is_sending = true;
            inner.state.last_error = None;
            self.save(&inner);

            (ticket, conversation_id, history)
        };

        debug!(
            conversation_id = %conversation_id,
            provider = self.provider.name(),
            messages = history.len(),
            "Requesting reply"
        );

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(ChatdeskError::Cancelled.into()),
            reply = self.request_reply(&history) => reply,
        };

        self.apply_reply(ticket, conversation_id, result)
    }

    async fn request_reply(&self, history: &[Message]) -> Result<ProviderReply> {
        match self.settings.response_timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.reply(history))
                .await
                .map_err(|_| ChatdeskError::ProviderTimeout { limit })?,
            None => self.provider.reply(history).await,
        }
    }

    fn apply_reply(
        &self,
        ticket: u64,
        conversation_id: String,
        result: Result<ProviderReply>,
    ) -> SendOutcome {
        let outcome = match result {
            Ok(ProviderReply { error: Some(e), .. }) => Err(e),
            Ok(reply) => Ok(reply.content),
            Err(e) => Err(e.to_string()),
        };

        let mut inner = self.lock();
        let current = inner.finish_send(ticket);

        if !current {
            debug!(conversation_id = %conversation_id, "Reply discarded: send was cleared");
            return SendOutcome::Discarded { conversation_id };
        }

        match outcome {
            Ok(_) if inner.state.conversation(&conversation_id).is_none() => {
                debug!(conversation_id = %conversation_id, "Reply discarded: conversation removed");
                SendOutcome::Discarded { conversation_id }
            }
            Ok(content) => {
                let message = Message::assistant(content);
                let message_id = message.id().to_string();
                if let Some(conversation) = inner.state.conversation_mut(&conversation_id) {
                    conversation.push(message);
                }
                self.save(&inner);
                debug!(conversation_id = %conversation_id, "Reply delivered");
                SendOutcome::Delivered {
                    conversation_id,
                    message_id,
                }
            }
            Err(error) => {
                warn!(conversation_id = %conversation_id, "Reply failed: {}", error);
                inner.state.last_error = Some(error.clone());
                inner.notices.push(Notice::error("Error", error.clone()));
                SendOutcome::Failed {
                    conversation_id,
                    error,
                }
            }
        }
    }

    /// Removes a conversation
    ///
    /// If it was selected, the first remaining conversation becomes active,
    /// or none if the list is now empty.
    ///
    /// # Returns
    ///
    /// `true` if a conversation was removed
    pub fn delete_conversation(&self, id: &str) -> bool {
        let mut inner = self.lock();
        let before = inner.state.conversations.len();
        inner.state.conversations.retain(|c| c.id() != id);
        if inner.state.conversations.len() == before {
            debug!(conversation_id = %id, "Delete ignored: unknown conversation");
            return false;
        }

        if inner.state.active_conversation_id.as_deref() == Some(id) {
            inner.state.active_conversation_id =
                inner.state.conversations.first().map(|c| c.id().to_string());
        }
        inner.notices.push(Notice::info(
            "Chat deleted",
            "The conversation has been removed.",
        ));
        self.save(&inner);

        info!(conversation_id = %id, "Deleted conversation");
        true
    }

    /// Removes every conversation and the stored record
    ///
    /// Also resets the in-flight flag and last error; a reply still
    /// outstanding is discarded when it arrives.
    pub fn clear_all_chats(&self) {
        let mut inner = self.lock();
        inner.state = StoreState::default();
        inner.current_send = None;
        inner.notices.push(Notice::info(
            "All chats cleared",
            "All conversations have been removed.",
        ));
        self.persistence.clear();
        info!("Cleared all conversations");
    }

    /// Snapshot of the full state
    pub fn state(&self) -> StoreState {
        self.lock().state.clone()
    }

    /// Conversations, newest-created first
    pub fn conversations(&self) -> Vec<Conversation> {
        self.lock().state.conversations.clone()
    }

    pub fn active_conversation_id(&self) -> Option<String> {
        self.lock().state.active_conversation_id.clone()
    }

    pub fn active_conversation(&self) -> Option<Conversation> {
        self.lock().state.active_conversation().cloned()
    }

    pub fn conversation(&self, id: &str) -> Option<Conversation> {
        self.lock().state.conversation(id).cloned()
    }

    /// True while a send awaits its reply
    pub fn is_sending(&self) -> bool {
        self.lock().state.is_sending
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().state.last_error.clone()
    }

    /// Clears the last error
    pub fn dismiss_error(&self) {
        self.lock().state.last_error = None;
    }

    /// Drains pending notices, oldest first
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.lock().notices)
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Name of the response provider in use
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
