//! Base provider trait and reply type for Chatdesk
//!
//! A response provider turns the message history of one conversation into
//! the next assistant reply.

use crate::chat::Message;
use crate::error::Result;
use async_trait::async_trait;

/// Outcome of one provider call
///
/// Mirrors the `{content}` / `{content: "", error}` contract: a provider may
/// report failure either through `Err` or through a reply carrying `error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReply {
    /// Assistant text; empty when `error` is set
    pub content: String,
    /// Failure text to show instead of a reply
    pub error: Option<String>,
}

impl ProviderReply {
    /// A successful reply
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdesk::providers::ProviderReply;
    ///
    /// let reply = ProviderReply::ok("Hello!");
    /// assert!(!reply.is_error());
    /// ```
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            error: None,
        }
    }

    /// A failed reply with empty content
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Response provider trait
///
/// Implementations must be shareable across tasks; the conversation store
/// holds one behind an `Arc` and calls it without holding any lock.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    /// Produces the reply to the last message of `history`
    ///
    /// # Arguments
    ///
    /// * `history` - Ordered messages of one conversation, oldest first
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot be reached
    async fn reply(&self, history: &[Message]) -> Result<ProviderReply>;

    /// Short provider name for logs and status lines
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_reply() {
        let reply = ProviderReply::ok("text");
        assert_eq!(reply.content, "text");
        assert!(reply.error.is_none());
    }

    #[test]
    fn test_failed_reply_has_empty_content() {
        let reply = ProviderReply::failed("boom");
        assert!(reply.is_error());
        assert!(reply.content.is_empty());
        assert_eq!(reply.error.as_deref(), Some("boom"));
    }
}
