//! Command-line interface definition for Chatdesk
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for chat, history management, markdown rendering and
//! local accounts.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chatdesk - terminal chat client with local history
#[derive(Parser, Debug, Clone)]
#[command(name = "chatdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the storage directory from config
    #[arg(long, global = true)]
    pub storage_path: Option<PathBuf>,

    /// Override the response provider from config (demo)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Chatdesk
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Inspect and manage saved conversations
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Render markdown the way assistant replies are shown
    Render {
        /// File to render; reads stdin when omitted
        file: Option<PathBuf>,

        /// Print the parsed elements as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Manage the local account
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List saved conversations
    List,

    /// Print a conversation
    Show {
        /// Conversation ID (from `history list`)
        id: String,
    },

    /// Delete a conversation
    Delete {
        /// Conversation ID
        id: String,
    },

    /// Delete every conversation
    Clear,
}

/// Account subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Create an account and sign in
    Signup { email: String, password: String },

    /// Sign in to an existing account
    Signin { email: String, password: String },

    /// End the current session
    Signout,

    /// Show the signed-in account
    Whoami,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            storage_path: None,
            provider: None,
            command: Commands::Chat,
        }
    }
}
