//! Special commands parser for interactive chat mode
//!
//! Lines starting with `/` manage conversations instead of being sent:
//! create, list, switch, delete, clear, help and exit. Command words are
//! case-insensitive; arguments are kept as typed.

use crate::chat::Conversation;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// How a command names a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationRef {
    /// 1-based position in the `/list` output
    Index(usize),
    /// Full id or a unique prefix of one
    Id(String),
}

impl ConversationRef {
    fn parse(command: &str, arg: &str) -> Result<Self, CommandError> {
        if arg.chars().all(|c| c.is_ascii_digit()) {
            return match arg.parse::<usize>() {
                Ok(index) if index > 0 => Ok(ConversationRef::Index(index)),
                _ => Err(CommandError::UnsupportedArgument {
                    command: command.to_string(),
                    arg: arg.to_string(),
                }),
            };
        }
        Ok(ConversationRef::Id(arg.to_string()))
    }

    /// Finds the referenced conversation
    ///
    /// An id matches exactly, or as a case-insensitive prefix shared by no
    /// other conversation.
    pub fn resolve<'a>(&self, conversations: &'a [Conversation]) -> Option<&'a Conversation> {
        match self {
            ConversationRef::Index(index) => {
                index.checked_sub(1).and_then(|i| conversations.get(i))
            }
            ConversationRef::Id(id) => {
                if let Some(exact) = conversations.iter().find(|c| c.id() == id) {
                    return Some(exact);
                }
                let prefix = id.to_uppercase();
                let mut matches = conversations
                    .iter()
                    .filter(|c| c.id().to_uppercase().starts_with(&prefix));
                match (matches.next(), matches.next()) {
                    (Some(only), None) => Some(only),
                    _ => None,
                }
            }
        }
    }
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new conversation
    New,
    /// List conversations, newest first
    List,
    /// Select another conversation
    Switch(ConversationRef),
    /// Delete a conversation; the active one when no argument is given
    Delete(Option<ConversationRef>),
    /// Delete every conversation
    Clear,
    /// Display help information
    Help,
    /// Exit the interactive session
    Exit,
    /// Not a special command; send the input as a message
    None,
}

fn no_argument(
    command: &str,
    arg: Option<&str>,
    result: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    match arg {
        Some(arg) => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
        None => Ok(result),
    }
}

/// Parse a line of chat input
///
/// # Errors
///
/// Returns `CommandError` for unknown commands or bad arguments
///
/// # Examples
///
/// ```
/// use chatdesk::commands::special_commands::{
///     parse_special_command, ConversationRef, SpecialCommand,
/// };
///
/// assert_eq!(parse_special_command("/NEW").unwrap(), SpecialCommand::New);
/// assert_eq!(
///     parse_special_command("/switch 2").unwrap(),
///     SpecialCommand::Switch(ConversationRef::Index(2))
/// );
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (word, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), Some(rest.trim()).filter(|a| !a.is_empty())),
        None => (lower.clone(), None),
    };

    match word.as_str() {
        "/new" => no_argument("/new", arg, SpecialCommand::New),
        "/list" | "/ls" => no_argument("/list", arg, SpecialCommand::List),
        "/clear" => no_argument("/clear", arg, SpecialCommand::Clear),
        "/help" | "/?" => no_argument("/help", arg, SpecialCommand::Help),
        "/exit" | "/quit" | "exit" | "quit" => no_argument("/exit", arg, SpecialCommand::Exit),
        "/switch" => match arg {
            Some(arg) => Ok(SpecialCommand::Switch(ConversationRef::parse("/switch", arg)?)),
            None => Err(CommandError::MissingArgument {
                command: "/switch".to_string(),
                usage: "/switch <number|id>".to_string(),
            }),
        },
        "/delete" => match arg {
            Some(arg) => Ok(SpecialCommand::Delete(Some(ConversationRef::parse(
                "/delete", arg,
            )?))),
            None => Ok(SpecialCommand::Delete(None)),
        },
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print the list of special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

CONVERSATIONS:
  /new              - Start a new conversation
  /list             - List conversations (newest first)
  /switch <n|id>    - Switch to conversation number n, or by id prefix
  /delete [n|id]    - Delete a conversation (the current one by default)
  /clear            - Delete all conversations

SESSION:
  /help             - Show this help
  /exit             - Leave the chat (also: exit, quit, Ctrl-D)

While a reply is pending, Ctrl-C cancels it.
Anything else you type is sent as a message.
"#
    );
}
