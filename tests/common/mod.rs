use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chatdesk::chat::{ChatSettings, ConversationStore, Message};
use chatdesk::error::Result;
use chatdesk::providers::{ProviderReply, ResponseProvider};
use chatdesk::storage::{ConversationPersistence, KeyValueStore, SledStore};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn create_temp_storage() -> (Arc<SledStore>, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let storage = SledStore::open(tmp.path().join("store")).expect("failed to open sled store");
    (Arc::new(storage), tmp)
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Provider that answers with a fixed reply and records each history it saw
#[allow(dead_code)]
pub struct RecordingProvider {
    reply: String,
    pub histories: Arc<Mutex<Vec<Vec<String>>>>,
}

#[allow(dead_code)]
impl RecordingProvider {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            histories: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ResponseProvider for RecordingProvider {
    async fn reply(&self, history: &[Message]) -> Result<ProviderReply> {
        self.histories
            .lock()
            .unwrap()
            .push(history.iter().map(|m| m.content().to_string()).collect());
        Ok(ProviderReply::ok(self.reply.clone()))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Build an initialized store over `storage` with default settings
#[allow(dead_code)]
pub fn store_over(
    storage: Arc<dyn KeyValueStore>,
    provider: Arc<dyn ResponseProvider>,
) -> ConversationStore {
    let store = ConversationStore::new(
        ConversationPersistence::new(storage),
        provider,
        ChatSettings::default(),
    );
    store.initialize();
    store
}
