//! Binary Dollar CLI - terminal console for API tokens
//!
//! Without a subcommand the interactive console starts. The one-shot
//! subcommands print their result and exit non-zero on failure.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use bdollar_client::{BinaryDollarClient, ClientConfig, ConnectionManager, DEFAULT_BASE_URL};

mod commands;
mod display;
mod manager;
mod repl;

use manager::{StdoutClipboard, TokenManager};

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage Binary Dollar API tokens", long_about = None)]
struct Cli {
    /// Base URL of the Binary Dollar API
    #[arg(long, env = "BDOLLAR_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Credential sent as a bearer token
    #[arg(long, env = "BDOLLAR_API_TOKEN", hide_env_values = true, global = true)]
    api_token: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show service health
    Status,

    /// Perform the authenticated handshake
    Connect,

    /// Manage tokens
    #[command(subcommand)]
    Tokens(TokensCommand),

    /// Start the interactive console (default)
    Console,
}

#[derive(Subcommand, Debug)]
enum TokensCommand {
    /// List tokens with masked secrets
    List,

    /// Create a token and print its secret once
    Create {
        /// Display name for the token
        name: String,
    },

    /// Revoke a token by its secret
    Revoke {
        /// Secret of the token to revoke
        token: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {e}", "Error:".bright_red());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::new(cli.base_url);
    if let Some(token) = &cli.api_token {
        config = config.with_api_token(token.as_str());
    }

    let client = Arc::new(BinaryDollarClient::new(config)?);
    let connection = ConnectionManager::new(Arc::clone(&client))
        .with_api_token(cli.api_token.as_deref().unwrap_or_default());

    match cli.command.unwrap_or(Command::Console) {
        Command::Status => commands::status(client.as_ref()).await,
        Command::Connect => commands::connect(&connection).await,
        Command::Tokens(TokensCommand::List) => commands::list_tokens(client.as_ref()).await,
        Command::Tokens(TokensCommand::Create { name }) => {
            commands::create_token(client.as_ref(), &name).await
        }
        Command::Tokens(TokensCommand::Revoke { token }) => {
            commands::revoke_token(client.as_ref(), &token).await
        }
        Command::Console => {
            let mut manager = TokenManager::new(Arc::clone(&client));
            let mut clipboard = StdoutClipboard;
            repl::run_console(&connection, &mut manager, &mut clipboard).await
        }
    }
}
