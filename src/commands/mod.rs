/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`: interactive chat session
- `history`: list, show and delete saved conversations
- `render`: render markdown the way replies are displayed
- `auth`: local account management

Handlers open the configured storage, build the library components and
print results; the logic lives in the library modules.
*/

use crate::chat::{ChatSettings, ConversationStore};
use crate::config::Config;
use crate::error::Result;
use crate::providers::create_provider;
use crate::storage::{ConversationPersistence, KeyValueStore, SledStore};
use std::sync::Arc;

pub mod auth;
pub mod display;
pub mod history;
pub mod render;
pub mod special_commands;

/// Open the configured on-disk store
///
/// # Errors
///
/// Returns `ChatdeskError::Storage` if the database cannot be opened
pub fn open_storage(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    tracing::debug!("Opening storage at {}", config.storage.path.display());
    Ok(Arc::new(SledStore::open(&config.storage.path)?))
}

/// Build an initialized conversation store over `storage`
///
/// # Errors
///
/// Returns error if the configured provider cannot be created
pub fn build_store(config: &Config, storage: Arc<dyn KeyValueStore>) -> Result<ConversationStore> {
    let persistence = ConversationPersistence::with_key(storage, &config.storage.key);
    let provider = create_provider(&config.provider)?;
    let store = ConversationStore::new(persistence, provider, ChatSettings::from(&config.chat));
    store.initialize();
    Ok(store)
}

// Chat command handler
pub mod chat {
    //! Interactive chat session.
    //!
    //! Runs a readline loop over a [`ConversationStore`]: slash commands
    //! manage conversations, anything else is sent to the provider and the
    //! reply is rendered through the markdown parser.

    use super::display::{render_conversation, render_message, render_notice};
    use super::special_commands::{
        parse_special_command, print_help, ConversationRef, SpecialCommand,
    };
    use super::*;
    use crate::chat::SendOutcome;
    use crate::helpers::format_timestamp;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use tokio_util::sync::CancellationToken;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    ///
    /// # Errors
    ///
    /// Returns error if storage, provider or the line editor cannot be set up
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let storage = open_storage(&config)?;
        let store = build_store(&config, storage)?;

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&store);

        loop {
            let prompt = format_prompt(&store);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::New => {
                            store.create_conversation();
                            println!("{}\n", "Started a new conversation.".green());
                        }
                        SpecialCommand::List => print_conversation_list(&store),
                        SpecialCommand::Switch(target) => switch_to(&store, &target),
                        SpecialCommand::Delete(target) => delete(&store, target.as_ref()),
                        SpecialCommand::Clear => store.clear_all_chats(),
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => send(&store, trimmed).await,
                    }

                    print_notices(&store);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Send one message, letting Ctrl-C cancel the wait
    async fn send(store: &ConversationStore, content: &str) {
        println!("{}", "Thinking...".dimmed());

        let token = CancellationToken::new();
        let pending = store.send_user_message_with_cancel(content, token.clone());
        tokio::pin!(pending);

        let outcome = loop {
            tokio::select! {
                outcome = &mut pending => break outcome,
                _ = tokio::signal::ctrl_c() => {
                    tracing::debug!("Cancelling pending reply");
                    token.cancel();
                }
            }
        };

        if let SendOutcome::Delivered {
            conversation_id,
            message_id,
        } = outcome
        {
            let reply = store
                .conversation(&conversation_id)
                .and_then(|c| c.messages().iter().find(|m| m.id() == message_id).cloned());
            if let Some(reply) = reply {
                println!("\n{}\n", render_message(&reply, chrono::Utc::now()));
            }
        }
    }

    fn switch_to(store: &ConversationStore, target: &ConversationRef) {
        let conversations = store.conversations();
        let Some(conversation) = target.resolve(&conversations) else {
            eprintln!("{}\n", "No such conversation. Use /list to see them.".red());
            return;
        };
        match store.set_active_conversation(conversation.id()) {
            Ok(()) => println!("\n{}\n", render_conversation(conversation, chrono::Utc::now())),
            Err(e) => eprintln!("{}\n", e.to_string().red()),
        }
    }

    fn delete(store: &ConversationStore, target: Option<&ConversationRef>) {
        let conversations = store.conversations();
        let id = match target {
            Some(target) => target.resolve(&conversations).map(|c| c.id().to_string()),
            None => store.active_conversation_id(),
        };
        match id {
            Some(id) => {
                store.delete_conversation(&id);
            }
            None => eprintln!("{}\n", "No such conversation. Use /list to see them.".red()),
        }
    }

    fn print_notices(store: &ConversationStore) {
        for notice in store.take_notices() {
            println!("{}\n", render_notice(&notice));
        }
    }

    fn print_conversation_list(store: &ConversationStore) {
        let state = store.state();
        if state.conversations.is_empty() {
            println!("{}\n", "No conversations yet.".yellow());
            return;
        }

        let now = chrono::Utc::now();
        for (i, conversation) in state.conversations.iter().enumerate() {
            let active = state.active_conversation_id.as_deref() == Some(conversation.id());
            let marker = if active { "*".green().bold() } else { " ".normal() };
            println!(
                "{} {:>2}. {}  {}",
                marker,
                i + 1,
                conversation.title(),
                format!(
                    "({} messages, {})",
                    conversation.messages().len(),
                    format_timestamp(conversation.updated_at(), now)
                )
                .dimmed()
            );
        }
        println!();
    }

    fn format_prompt(store: &ConversationStore) -> String {
        let title = store
            .active_conversation()
            .map(|c| c.title().to_string())
            .unwrap_or_else(|| store.settings().placeholder_title.clone());
        format!("[{}] >> ", title.cyan())
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(store: &ConversationStore) {
        println!();
        println!("{}", "Chatdesk".bold());
        println!(
            "Provider: {}   Saved conversations: {}",
            store.provider_name().cyan(),
            store.conversations().len()
        );
        println!("Type {} for commands.\n", "/help".cyan());
    }
}
