//! Key-value storage and conversation persistence
//!
//! The conversation store never touches a database directly. It talks to a
//! [`ConversationPersistence`] adapter, which serializes the conversation
//! list into a single record of a [`KeyValueStore`].
//!
//! Two stores are provided:
//!
//! - [`MemoryStore`]: process-local map, optionally quota-limited
//! - [`SledStore`]: embedded `sled` database on disk

use crate::error::Result;

pub mod memory;
pub mod persistence;
pub mod sled_store;

pub use memory::MemoryStore;
pub use persistence::{ConversationPersistence, PersistenceFailure, PersistenceOp};
pub use sled_store::SledStore;

/// Default key under which conversations are stored
pub const DEFAULT_CONVERSATIONS_KEY: &str = "ai-chatbot-conversations";

/// Synchronous string key-value store
///
/// Mirrors a browser-style local storage: values are whole text records and
/// every call completes before returning.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `ChatdeskError::Storage` if the backend cannot be read
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `ChatdeskError::Storage` if the write is rejected
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns `ChatdeskError::Storage` if the backend cannot be written
    fn remove(&self, key: &str) -> Result<()>;
}
