use crate::chat::ConversationStore;
use crate::cli::HistoryCommand;
use crate::commands::display::render_conversation;
use crate::commands::special_commands::ConversationRef;
use crate::commands::{build_store, open_storage};
use crate::config::Config;
use crate::error::{ChatdeskError, Result};
use crate::helpers::{format_timestamp, generate_title};
use crate::storage::ConversationPersistence;
use colored::Colorize;
use prettytable::{format, Table};

fn resolve_id(store: &ConversationStore, id: &str) -> Result<String> {
    let conversations = store.conversations();
    ConversationRef::Id(id.to_string())
        .resolve(&conversations)
        .map(|c| c.id().to_string())
        .ok_or_else(|| ChatdeskError::ConversationNotFound(id.to_string()).into())
}

/// Handle history commands
pub fn handle_history(command: HistoryCommand, config: &Config) -> Result<()> {
    let storage = open_storage(config)?;

    match command {
        HistoryCommand::List => {
            let persistence = ConversationPersistence::with_key(storage, &config.storage.key);
            let conversations = persistence.load();

            if conversations.is_empty() {
                println!("{}", "No conversation history found.".yellow());
                return Ok(());
            }

            let now = chrono::Utc::now();
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Messages".bold(),
                "Last Updated".bold()
            ]);

            for conversation in &conversations {
                let id_short: String = conversation.id().chars().take(8).collect();
                table.add_row(prettytable::row![
                    id_short.cyan(),
                    generate_title(conversation.title(), 40, "..."),
                    conversation.messages().len(),
                    format_timestamp(conversation.updated_at(), now)
                ]);
            }

            println!("\nConversation History:");
            table.printstd();
            println!();
            println!(
                "Use {} to read a conversation.",
                "chatdesk history show <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => {
            let store = build_store(config, storage)?;
            let id = resolve_id(&store, &id)?;
            if let Some(conversation) = store.conversation(&id) {
                println!("{}", render_conversation(&conversation, chrono::Utc::now()));
            }
        }
        HistoryCommand::Delete { id } => {
            let store = build_store(config, storage)?;
            let id = resolve_id(&store, &id)?;
            store.delete_conversation(&id);
            println!("{}", format!("Deleted conversation {}", id).green());
        }
        HistoryCommand::Clear => {
            let store = build_store(config, storage)?;
            store.clear_all_chats();
            println!("{}", "All conversations have been removed.".green());
        }
    }

    Ok(())
}
