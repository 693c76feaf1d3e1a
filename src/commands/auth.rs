use colored::Colorize;

use crate::auth::AuthService;
use crate::cli::AuthCommand;
use crate::commands::open_storage;
use crate::config::Config;
use crate::error::{ChatdeskError, Result};

/// Handle account commands
///
/// Failures are printed with their user-facing text and returned as
/// `ChatdeskError::Auth` so the process exits non-zero.
pub fn handle_auth(command: AuthCommand, config: &Config) -> Result<()> {
    let auth = AuthService::new(open_storage(config)?);

    let outcome = match command {
        AuthCommand::Signup { email, password } => auth.sign_up(&email, &password).map(|user| {
            println!(
                "{} Your account has been created successfully. Signed in as {}.",
                "Welcome!".green().bold(),
                user.email.cyan()
            );
        }),
        AuthCommand::Signin { email, password } => auth.sign_in(&email, &password).map(|user| {
            println!(
                "{} You have signed in successfully as {}.",
                "Welcome back!".green().bold(),
                user.email.cyan()
            );
        }),
        AuthCommand::Signout => auth.sign_out().map(|()| {
            println!(
                "{} You have been signed out successfully.",
                "Signed out.".green().bold()
            );
        }),
        AuthCommand::Whoami => auth.current_user().map(|user| match user {
            Some(user) => println!("Signed in as {}", user.email.cyan()),
            None => println!("{}", "Not signed in.".yellow()),
        }),
    };

    outcome.map_err(|e| ChatdeskError::Auth(e).into())
}
