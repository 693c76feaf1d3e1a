//! Conversation persistence adapter
//!
//! Serializes the whole conversation list into one record of a
//! [`KeyValueStore`]. Timestamps are written as RFC-3339 UTC strings with
//! millisecond precision and parsed back into instants on load.
//!
//! Failures never propagate: they are logged and reported to an optional
//! hook, and the in-memory state stays authoritative.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{KeyValueStore, DEFAULT_CONVERSATIONS_KEY};
use crate::chat::{Conversation, Message, Role};
use crate::error::{ChatdeskError, Result};

/// Stored form of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationRecord {
    id: String,
    title: String,
    messages: Vec<MessageRecord>,
    created_at: String,
    updated_at: String,
}

/// Stored form of a message
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageRecord {
    id: String,
    role: Role,
    content: String,
    timestamp: String,
}

impl From<&Conversation> for ConversationRecord {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id().to_string(),
            title: conversation.title().to_string(),
            messages: conversation.messages().iter().map(MessageRecord::from).collect(),
            created_at: format_instant(conversation.created_at()),
            updated_at: format_instant(conversation.updated_at()),
        }
    }
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: message.role(),
            content: message.content().to_string(),
            timestamp: format_instant(message.timestamp()),
        }
    }
}

impl TryFrom<ConversationRecord> for Conversation {
    type Error = anyhow::Error;

    fn try_from(record: ConversationRecord) -> Result<Self> {
        let messages = record
            .messages
            .into_iter()
            .map(|m| {
                Ok(Message::from_parts(
                    m.id,
                    m.role,
                    m.content,
                    parse_instant(&m.timestamp)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Conversation::from_parts(
            record.id,
            record.title,
            messages,
            parse_instant(&record.created_at)?,
            parse_instant(&record.updated_at)?,
        ))
    }
}

/// Formats an instant the way it is stored, e.g. `2024-05-01T12:00:00.000Z`
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored timestamp back into an instant
///
/// # Errors
///
/// Returns `ChatdeskError::Storage` if the text is not RFC-3339
pub fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ChatdeskError::Storage(format!("Invalid timestamp '{}': {}", text, e)).into())
}

/// Serializes conversations into the stored JSON array
///
/// # Errors
///
/// Returns `ChatdeskError::Serialization` if encoding fails
pub fn encode_conversations(conversations: &[Conversation]) -> Result<String> {
    let records: Vec<ConversationRecord> =
        conversations.iter().map(ConversationRecord::from).collect();
    Ok(serde_json::to_string(&records).map_err(ChatdeskError::from)?)
}

/// Parses the stored JSON array back into conversations, preserving order
///
/// # Errors
///
/// Returns an error if the text is not a valid record array or any
/// timestamp fails to parse
pub fn decode_conversations(text: &str) -> Result<Vec<Conversation>> {
    let records: Vec<ConversationRecord> =
        serde_json::from_str(text).map_err(ChatdeskError::from)?;
    records.into_iter().map(Conversation::try_from).collect()
}

/// Which adapter operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOp {
    Save,
    Load,
    Clear,
}

/// A swallowed persistence failure, reported to the failure hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub op: PersistenceOp,
    pub message: String,
}

type FailureHook = Arc<dyn Fn(&PersistenceFailure) + Send + Sync>;

/// Reads and writes the conversation list through a key-value store
#[derive(Clone)]
pub struct ConversationPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
    on_failure: Option<FailureHook>,
}

impl std::fmt::Debug for ConversationPersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationPersistence")
            .field("key", &self.key)
            .field("has_failure_hook", &self.on_failure.is_some())
            .finish()
    }
}

impl ConversationPersistence {
    /// Creates an adapter using the default storage key
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use chatdesk::storage::{ConversationPersistence, MemoryStore};
    ///
    /// let persistence = ConversationPersistence::new(Arc::new(MemoryStore::new()));
    /// assert!(persistence.load().is_empty());
    /// ```
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_CONVERSATIONS_KEY)
    }

    /// Creates an adapter storing its record under `key`
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            on_failure: None,
        }
    }

    /// Registers a callback invoked for every swallowed failure
    pub fn with_failure_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&PersistenceFailure) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(hook));
        self
    }

    /// Storage key of the conversation record
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Overwrites the stored record with `conversations`
    ///
    /// Never fails; errors are logged and reported to the failure hook.
    pub fn save(&self, conversations: &[Conversation]) {
        let result = encode_conversations(conversations)
            .and_then(|data| self.store.set(&self.key, &data));

        match result {
            Ok(()) => debug!(count = conversations.len(), "Saved conversations"),
            Err(e) => self.report(PersistenceOp::Save, format!("Failed to save conversations: {}", e)),
        }
    }

    /// Reads the stored conversations
    ///
    /// Returns an empty list if nothing is stored or the record cannot be
    /// read or parsed.
    pub fn load(&self) -> Vec<Conversation> {
        let data = match self.store.get(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => return Vec::new(),
            Err(e) => {
                self.report(PersistenceOp::Load, format!("Failed to load conversations: {}", e));
                return Vec::new();
            }
        };

        match decode_conversations(&data) {
            Ok(conversations) => {
                debug!(count = conversations.len(), "Loaded conversations");
                conversations
            }
            Err(e) => {
                self.report(PersistenceOp::Load, format!("Failed to load conversations: {}", e));
                Vec::new()
            }
        }
    }

    /// Removes the stored record; clearing twice is fine
    pub fn clear(&self) {
        match self.store.remove(&self.key) {
            Ok(()) => debug!("Cleared stored conversations"),
            Err(e) => self.report(PersistenceOp::Clear, format!("Failed to clear conversations: {}", e)),
        }
    }

    fn report(&self, op: PersistenceOp, message: String) {
        warn!("{}", message);
        if let Some(hook) = &self.on_failure {
            hook(&PersistenceFailure { op, message });
        }
    }
}
