//! Chatdesk - conversation manager for a terminal AI chat client
//!
//! This library provides the conversation store, its persistence adapter,
//! the markdown parser used to display replies, a demo response provider
//! and local accounts.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Conversations, messages and the conversation store
//! - `storage`: Key-value stores and conversation persistence
//! - `markdown`: Fenced code, block and inline parsing of reply text
//! - `providers`: Response provider abstraction and the demo provider
//! - `auth`: Email/password accounts and sessions
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chatdesk::chat::{ChatSettings, ConversationStore, SendOutcome};
//! use chatdesk::config::DemoConfig;
//! use chatdesk::providers::DemoProvider;
//! use chatdesk::storage::{ConversationPersistence, MemoryStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = DemoProvider::new(DemoConfig { min_delay_ms: 0, max_delay_ms: 0 });
//!     let store = ConversationStore::new(
//!         ConversationPersistence::new(Arc::new(MemoryStore::new())),
//!         Arc::new(provider),
//!         ChatSettings::default(),
//!     );
//!     store.initialize();
//!
//!     let outcome = store.send_user_message("hello").await;
//!     assert!(matches!(outcome, SendOutcome::Delivered { .. }));
//! }
//! ```

pub mod auth;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod helpers;
pub mod markdown;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use chat::{ConversationStore, SendOutcome};
pub use config::Config;
pub use error::{ChatdeskError, Result};
pub use markdown::parse_document;
