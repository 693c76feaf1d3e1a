//! Error types for Chatdesk
//!
//! This module defines the error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use std::time::Duration;

use thiserror::Error;

use crate::auth::AuthError;

/// Main error type for Chatdesk operations
///
/// Covers configuration loading, the key-value store, the response
/// provider and conversation lookups. Persistence failures raised by the
/// store never reach chat operations; they are logged at the adapter.
#[derive(Error, Debug)]
pub enum ChatdeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store errors (open, read, write, quota)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Response provider errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Response provider did not answer within the configured deadline
    #[error("Provider did not respond within {limit:?}")]
    ProviderTimeout {
        /// The configured deadline
        limit: Duration,
    },

    /// An outstanding request was cancelled by the caller
    #[error("Request was cancelled")]
    Cancelled,

    /// No conversation with the given id exists in the store
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// Authentication errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Chatdesk operations
///
/// Uses `anyhow::Error` so callers can attach context while still being
/// able to downcast to [`ChatdeskError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ChatdeskError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = ChatdeskError::Storage("quota exceeded".to_string());
        assert_eq!(error.to_string(), "Storage error: quota exceeded");
    }

    #[test]
    fn test_provider_timeout_display() {
        let error = ChatdeskError::ProviderTimeout {
            limit: Duration::from_secs(30),
        };
        assert_eq!(error.to_string(), "Provider did not respond within 30s");
    }

    #[test]
    fn test_provider_timeout_display_keeps_subsecond_deadline() {
        let error = ChatdeskError::ProviderTimeout {
            limit: Duration::from_millis(250),
        };
        assert_eq!(error.to_string(), "Provider did not respond within 250ms");
    }

    #[test]
    fn test_conversation_not_found_display() {
        let error = ChatdeskError::ConversationNotFound("abc".to_string());
        assert_eq!(error.to_string(), "Conversation not found: abc");
    }

    #[test]
    fn test_auth_error_is_transparent() {
        let error: ChatdeskError = AuthError::InvalidCredentials.into();
        assert_eq!(
            error.to_string(),
            "Invalid email or password. Please try again."
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ChatdeskError = json_error.into();
        assert!(matches!(error, ChatdeskError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ChatdeskError = yaml_error.into();
        assert!(matches!(error, ChatdeskError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatdeskError>();
    }
}
