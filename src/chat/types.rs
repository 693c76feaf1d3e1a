//! Chat data model: messages, conversations and store snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person using the client
    User,
    /// Produced by the response provider
    Assistant,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn of a conversation
///
/// Messages are immutable once created; the fields are private and only
/// readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: String,
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdesk::chat::{Message, Role};
    ///
    /// let msg = Message::user("Hello!");
    /// assert_eq!(msg.role(), Role::User);
    /// assert_eq!(msg.content(), "Hello!");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: helpers::new_id(),
            role,
            content: content.into(),
            timestamp: helpers::now(),
        }
    }

    /// Rebuilds a message from stored parts
    pub fn from_parts(
        id: impl Into<String>,
        role: Role,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A titled, ordered sequence of messages
///
/// Messages are append-only. `updated_at` never moves backwards and never
/// precedes `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    id: String,
    title: String,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates an empty conversation with the given placeholder title
    pub fn new(placeholder_title: impl Into<String>) -> Self {
        let now = helpers::now();
        Self {
            id: helpers::new_id(),
            title: placeholder_title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a conversation from stored parts
    ///
    /// An `updated_at` earlier than `created_at` is raised to `created_at`.
    pub fn from_parts(
        id: impl Into<String>,
        title: impl Into<String>,
        messages: Vec<Message>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if no message has been appended yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Appends a message and bumps `updated_at`
    pub(crate) fn push(&mut self, message: Message) {
        let stamp = message.timestamp().max(helpers::now());
        self.updated_at = self.updated_at.max(stamp);
        self.messages.push(message);
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }
}

/// Snapshot of everything the conversation store owns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Conversations, newest-created first
    pub conversations: Vec<Conversation>,
    /// Selected conversation; always refers to an entry of `conversations`
    pub active_conversation_id: Option<String>,
    /// True while a send awaits the response provider
    pub is_sending: bool,
    /// Text of the most recent provider failure
    pub last_error: Option<String>,
}

impl StoreState {
    /// Looks up a conversation by id
    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    /// The selected conversation, if any
    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id
            .as_deref()
            .and_then(|id| self.conversation(id))
    }

    pub(crate) fn conversation_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id() == id)
    }
}

/// Severity of a [`Notice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient user-facing notification raised by a store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"assistant\"").unwrap(),
            Role::Assistant
        );
    }

    #[test]
    fn test_new_conversation_is_empty_with_equal_timestamps() {
        let conversation = Conversation::new("New Chat");
        assert!(conversation.is_empty());
        assert_eq!(conversation.title(), "New Chat");
        assert_eq!(conversation.created_at(), conversation.updated_at());
    }

    #[test]
    fn test_push_bumps_updated_at_monotonically() {
        let mut conversation = Conversation::new("New Chat");
        let before = conversation.updated_at();
        conversation.push(Message::user("hi"));
        assert!(conversation.updated_at() >= before);
        assert_eq!(conversation.messages().len(), 1);
    }

    #[test]
    fn test_push_of_old_message_does_not_move_updated_at_back() {
        let mut conversation = Conversation::new("New Chat");
        let before = conversation.updated_at();
        let old = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        conversation.push(Message::from_parts("m1", Role::User, "old", old));
        assert!(conversation.updated_at() >= before);
    }

    #[test]
    fn test_from_parts_repairs_updated_before_created() {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let conversation = Conversation::from_parts("c1", "t", vec![], created, updated);
        assert_eq!(conversation.updated_at(), created);
    }

    #[test]
    fn test_active_conversation_lookup() {
        let conversation = Conversation::new("New Chat");
        let id = conversation.id().to_string();
        let state = StoreState {
            conversations: vec![conversation],
            active_conversation_id: Some(id.clone()),
            ..Default::default()
        };
        assert_eq!(state.active_conversation().map(|c| c.id()), Some(id.as_str()));
    }
}
