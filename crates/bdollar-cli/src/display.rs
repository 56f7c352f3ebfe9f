//! Display utilities for console output.
//!
//! Renderers return strings so the console and one-shot commands share them.

use bdollar_client::{BinaryDollarApi, ConnectionState};
use bdollar_common::{ApiToken, ConnectResponse, StatusResponse};
use colored::Colorize;

use crate::manager::TokenManager;

pub const FALLBACK_NOTICE: &str =
    "Binary Dollar API is currently unavailable. Using local fallback mode.";
pub const NEW_TOKEN_NOTICE: &str = "Copy it now - you won't see it again.";
pub const EMPTY_STATE: &str = "No Binary Dollar API tokens created yet.";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn fallback_banner() -> String {
    format!("{} {FALLBACK_NOTICE}", "⚠".bright_yellow())
}

pub fn error_banner(message: &str) -> String {
    format!("{} {}", "✗".bright_red().bold(), message.bright_red())
}

/// Panel shown right after creation, holding the only full view of a secret.
pub fn new_token_panel(secret: &str) -> String {
    format!(
        "{} {NEW_TOKEN_NOTICE}\n  {}",
        "New Binary Dollar token created!".bright_green().bold(),
        secret.bright_white().on_black()
    )
}

/// One numbered row of the token list.
pub fn token_row(position: usize, token: &ApiToken, shown: &str) -> String {
    let badge = if token.is_active {
        "Active".bright_green()
    } else {
        "Revoked".bright_black()
    };

    let mut dates = format!("Created: {}", token.created_at.format(DATE_FORMAT));
    if let Some(last_used) = token.last_used {
        dates.push_str(&format!(" • Last used: {}", last_used.format(DATE_FORMAT)));
    }

    format!(
        "[{position}] {} {badge}\n    {}\n    {}",
        token.name.bold(),
        shown.cyan(),
        dates.dimmed()
    )
}

pub fn connection_line(state: &ConnectionState) -> String {
    if state.is_connecting {
        format!("{} Connecting to Binary Dollar...", "○".bright_blue())
    } else if state.is_connected {
        format!("{} Connected to Binary Dollar", "●".bright_green())
    } else if let Some(error) = &state.error {
        format!(
            "{} Disconnected: {} (attempts failed: {})",
            "●".bright_red(),
            error,
            state.retry_count
        )
    } else {
        format!("{} Not connected. Use :connect <token>", "○".dimmed())
    }
}

pub fn handshake(response: &ConnectResponse) -> String {
    format!(
        "{} {}\n  Server: {}\n  Authenticated as: {}\n  At: {}",
        "✓".bright_green(),
        response.message,
        response.server_status,
        response.authenticated_as.bright_cyan(),
        response.timestamp.to_rfc3339()
    )
}

pub fn status(response: &StatusResponse) -> String {
    format!(
        "{} v{} {}\n  Uptime: {}\n  Last check: {}\n  User: {}\n  \
         Services: database {}, api {}, cdn {}",
        response.service.bright_magenta().bold(),
        response.version,
        response.status.bright_green(),
        response.uptime,
        response.last_check.to_rfc3339(),
        response.user.as_deref().unwrap_or("anonymous"),
        response.services.database,
        response.services.api,
        response.services.cdn
    )
}

/// Full console view: banners, the one-time secret, then the token list.
pub fn render_manager<A: BinaryDollarApi + ?Sized>(manager: &TokenManager<A>) -> String {
    let mut sections = Vec::new();

    if manager.is_using_fallback() {
        sections.push(fallback_banner());
    }
    if let Some(error) = manager.error() {
        sections.push(error_banner(error));
    }
    if let Some(secret) = manager.new_token() {
        sections.push(new_token_panel(secret));
    }

    sections.push(format!("{}", "Binary Dollar API Tokens".bright_cyan().bold()));

    if manager.tokens().is_empty() {
        sections.push(format!("  {}", EMPTY_STATE.dimmed()));
    } else {
        for (index, token) in manager.tokens().iter().enumerate() {
            sections.push(token_row(index + 1, token, manager.display_token(token)));
        }
    }

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::sync::Arc;

    use bdollar_client::{BinaryDollarClient, ClientConfig};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_token_row_active() {
        plain();
        let mut token = ApiToken::new(Uuid::new_v4(), "bd_12345...cdef", "Demo Token");
        token.created_at = Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();

        let row = token_row(1, &token, &token.token);
        assert!(row.starts_with("[1] Demo Token Active"));
        assert!(row.contains("bd_12345...cdef"));
        assert!(row.contains("Created: 2025-01-15"));
        assert!(!row.contains("Last used"));
    }

    #[test]
    fn test_token_row_revoked_with_last_used() {
        plain();
        let mut token = ApiToken::new(Uuid::new_v4(), "bd_x", "Old");
        token.revoke();
        token.last_used = Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());

        let row = token_row(3, &token, &token.token);
        assert!(row.contains("Revoked"));
        assert!(row.contains("Last used: 2025-02-01"));
    }

    #[test]
    fn test_new_token_panel() {
        plain();
        let panel = new_token_panel("bd_secret");
        assert!(panel.contains(NEW_TOKEN_NOTICE));
        assert!(panel.contains("bd_secret"));
    }

    #[test]
    fn test_connection_line() {
        plain();
        let mut state = ConnectionState::default();
        assert!(connection_line(&state).contains("Connecting"));

        state.is_connecting = false;
        state.error = Some("API token required".to_string());
        state.retry_count = 2;
        let line = connection_line(&state);
        assert!(line.contains("API token required"));
        assert!(line.contains('2'));

        state.error = None;
        state.is_connected = true;
        assert!(connection_line(&state).contains("Connected"));
    }

    #[test]
    fn test_render_empty_manager() {
        plain();
        let client = BinaryDollarClient::new(ClientConfig::default()).unwrap();
        let manager = TokenManager::new(Arc::new(client));

        let view = render_manager(&manager);
        assert!(view.contains(EMPTY_STATE));
        assert!(!view.contains(FALLBACK_NOTICE));
        assert!(!view.contains(NEW_TOKEN_NOTICE));
    }
}
