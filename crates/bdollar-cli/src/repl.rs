//! Interactive token console.

use anyhow::Result;
use bdollar_client::{BinaryDollarApi, ConnectionManager};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::display;
use crate::manager::{Clipboard, TokenManager};

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Create(String),
    Revoke(usize),
    Toggle(usize),
    Copy(usize),
    CopyNew,
    Refresh,
    Connect(Option<String>),
    Retry,
    SetToken(String),
    Status,
    Help,
}

impl ConsoleCommand {
    /// Parses a line. Returns the usage hint on malformed input.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(cmd) = line.trim().strip_prefix(':') else {
            return Err("Commands start with ':'. Type :help for available commands".to_string());
        };
        let (head, rest) = cmd
            .split_once(char::is_whitespace)
            .map_or((cmd, ""), |(head, rest)| (head, rest.trim()));

        let position = |usage: &str| {
            rest.parse::<usize>()
                .map_err(|_| format!("Usage: {usage}"))
        };

        match head {
            "create" if !rest.is_empty() => Ok(Self::Create(rest.to_string())),
            "create" => Err("Usage: :create <name>".to_string()),
            "revoke" => position(":revoke <n>").map(Self::Revoke),
            "toggle" => position(":toggle <n>").map(Self::Toggle),
            "copy" => position(":copy <n>").map(Self::Copy),
            "copy-new" => Ok(Self::CopyNew),
            "refresh" => Ok(Self::Refresh),
            "connect" => Ok(Self::Connect(
                (!rest.is_empty()).then(|| rest.to_string()),
            )),
            "retry" => Ok(Self::Retry),
            "token" if !rest.is_empty() => Ok(Self::SetToken(rest.to_string())),
            "token" => Err("Usage: :token <value>".to_string()),
            "status" => Ok(Self::Status),
            "help" => Ok(Self::Help),
            other => Err(format!(
                "Unknown command: :{other}\nType :help for available commands"
            )),
        }
    }
}

fn print_help() {
    println!("{}", "Console Commands:".bright_cyan().bold());
    for (command, text) in [
        (":create <name>", "Create a token (its secret is shown once)"),
        (":revoke <n>", "Revoke the token in row n"),
        (":toggle <n>", "Toggle the reveal state of row n"),
        (":copy <n>", "Copy the token text of row n"),
        (":copy-new", "Copy the secret of the token just created"),
        (":refresh", "Reload the token list"),
        (":connect [token]", "Connect, optionally with a new credential"),
        (":retry", "Reconnect with the stored credential"),
        (":token <value>", "Store a credential without connecting"),
        (":status", "Show service status"),
        (":help", "Show this help message"),
        ("Ctrl-D", "Exit the console"),
    ] {
        println!("  {} - {text}", command.bright_yellow());
    }
    println!();
}

fn missing_row(position: usize) {
    eprintln!("{} No token in row {position}", "Error:".bright_red());
}

/// Runs the console loop.
///
/// # Errors
///
/// Returns an error if the line editor cannot be initialised.
pub async fn run_console<A: BinaryDollarApi + ?Sized>(
    connection: &ConnectionManager<A>,
    manager: &mut TokenManager<A>,
    clipboard: &mut dyn Clipboard,
) -> Result<()> {
    println!("{}", "Binary Dollar token console".bright_magenta().bold());
    println!("{}", "Type :help for commands, Ctrl-D to exit".dimmed());
    println!();

    connection.mount().await;
    println!("{}", display::connection_line(&connection.state()));

    manager.fetch_tokens().await;
    println!("{}", display::render_manager(manager));

    let mut rl = DefaultEditor::new()?;

    loop {
        let readline = rl.readline(&format!("{} ", ">".bright_green()));

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                let command = match ConsoleCommand::parse(line) {
                    Ok(command) => command,
                    Err(usage) => {
                        eprintln!("{} {usage}", "Error:".bright_red());
                        continue;
                    }
                };

                if execute(command, connection, manager, clipboard).await {
                    println!("{}", display::render_manager(manager));
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("Exiting");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    Ok(())
}

/// Runs one command. Returns whether the token view should be redrawn.
async fn execute<A: BinaryDollarApi + ?Sized>(
    command: ConsoleCommand,
    connection: &ConnectionManager<A>,
    manager: &mut TokenManager<A>,
    clipboard: &mut dyn Clipboard,
) -> bool {
    match command {
        ConsoleCommand::Create(name) => {
            manager.set_new_token_name(name);
            if manager.can_create() {
                println!("{}", "Creating...".dimmed());
                manager.create_token().await;
            }
            true
        }
        ConsoleCommand::Revoke(position) => {
            // Rows carry the listed (masked) value, which is what gets sent.
            let Some(token) = manager.token_at(position) else {
                missing_row(position);
                return false;
            };
            if !token.is_active {
                eprintln!("{} Token is already revoked", "Error:".bright_red());
                return false;
            }
            let secret = token.token.clone();
            manager.revoke_token(&secret).await;
            true
        }
        ConsoleCommand::Toggle(position) => {
            let Some(id) = manager.token_at(position).map(|token| token.id) else {
                missing_row(position);
                return false;
            };
            manager.toggle_visibility(id);
            true
        }
        ConsoleCommand::Copy(position) => {
            let Some(text) = manager.token_at(position).map(|token| token.token.clone()) else {
                missing_row(position);
                return false;
            };
            manager.copy_text(clipboard, &text);
            false
        }
        ConsoleCommand::CopyNew => {
            if let Some(secret) = manager.new_token().map(str::to_string) {
                manager.copy_text(clipboard, &secret);
            } else {
                eprintln!("{} No token created in this session", "Error:".bright_red());
            }
            false
        }
        ConsoleCommand::Refresh => {
            manager.fetch_tokens().await;
            true
        }
        ConsoleCommand::Connect(token) => {
            if let Ok(response) = connection.connect(token.as_deref()).await {
                println!("{}", display::handshake(&response));
            }
            println!("{}", display::connection_line(&connection.state()));
            false
        }
        ConsoleCommand::Retry => {
            let _ = connection.retry().await;
            println!("{}", display::connection_line(&connection.state()));
            false
        }
        ConsoleCommand::SetToken(token) => {
            connection.set_api_token(&token);
            println!("{} Credential stored", "✓".bright_green());
            false
        }
        ConsoleCommand::Status => {
            match connection.api().status().await {
                Ok(status) => println!("{}", display::status(&status)),
                Err(e) => eprintln!("{} {e}", "Error:".bright_red()),
            }
            println!("{}", display::connection_line(&connection.state()));
            false
        }
        ConsoleCommand::Help => {
            print_help();
            false
        }
    }
}
