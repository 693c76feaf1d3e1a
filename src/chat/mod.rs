//! Conversations and the store that manages them

pub mod store;
pub mod types;

pub use store::{ChatSettings, ConversationStore, IgnoreReason, SendOutcome};
pub use types::{Conversation, Message, Notice, NoticeLevel, Role, StoreState};
