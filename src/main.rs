//! Chatdesk - terminal chat client
//!
#![doc = "Chatdesk - terminal chat client"]
#![doc = "Main entry point for the Chatdesk application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatdesk::cli::{Cli, Commands};
use chatdesk::commands;
use chatdesk::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat => {
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(command, &config)?;
            Ok(())
        }
        Commands::Render { file, json } => {
            commands::render::run_render(file.as_deref(), json)?;
            Ok(())
        }
        Commands::Auth { command } => {
            commands::auth::handle_auth(command, &config)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// `CHATDESK_LOG` takes precedence over `RUST_LOG`. Logs go to stderr so
/// they never mix with chat output.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "chatdesk=debug" } else { "chatdesk=info" };
    let env_filter = EnvFilter::try_from_env("CHATDESK_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
