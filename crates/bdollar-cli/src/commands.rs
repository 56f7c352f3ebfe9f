//! One-shot command implementations.

use anyhow::{Result, bail};
use bdollar_client::{BinaryDollarApi, ConnectionManager};
use colored::Colorize;

use crate::display;

/// Prints service health.
pub async fn status<A: BinaryDollarApi + ?Sized>(api: &A) -> Result<()> {
    let response = api.status().await?;
    println!("{}", display::status(&response));
    Ok(())
}

/// Performs the handshake with the stored credential.
pub async fn connect<A: BinaryDollarApi + ?Sized>(connection: &ConnectionManager<A>) -> Result<()> {
    let response = connection.connect(None).await?;
    println!("{}", display::handshake(&response));
    Ok(())
}

pub async fn list_tokens<A: BinaryDollarApi + ?Sized>(api: &A) -> Result<()> {
    let response = api.list_tokens().await?;

    if response.tokens.is_empty() {
        println!("{}", display::EMPTY_STATE.dimmed());
        return Ok(());
    }

    for (index, token) in response.tokens.iter().enumerate() {
        println!("{}", display::token_row(index + 1, token, &token.token));
    }
    Ok(())
}

/// Issues a token and prints its full secret.
pub async fn create_token<A: BinaryDollarApi + ?Sized>(api: &A, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Token name is required");
    }

    let response = api.create_token(name).await?;
    println!("{}", display::new_token_panel(&response.token.token));
    Ok(())
}

pub async fn revoke_token<A: BinaryDollarApi + ?Sized>(api: &A, token: &str) -> Result<()> {
    let response = api.revoke_token(token).await?;
    println!("{} {}", "✓".bright_green(), response.message);
    Ok(())
}
