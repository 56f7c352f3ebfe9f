//! Token manager controller.
//!
//! Holds the console's view of the token list and drives the API calls behind
//! it. Failures never escape; they land in [`TokenManager::error`] for the
//! display layer to show.

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;

use bdollar_client::BinaryDollarApi;
use bdollar_common::{ApiToken, DataSource};
use log::{error, warn};
use uuid::Uuid;

/// Destination for copied token values.
pub trait Clipboard {
    /// Writes `text` to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying sink cannot be written.
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// Writes the raw value to stdout so it can be piped elsewhere.
#[derive(Debug, Default)]
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{text}")?;
        stdout.flush()
    }
}

pub struct TokenManager<A: BinaryDollarApi + ?Sized> {
    api: Arc<A>,
    tokens: Vec<ApiToken>,
    new_token_name: String,
    is_creating: bool,
    visible_tokens: HashSet<Uuid>,
    new_token: Option<String>,
    error: Option<String>,
    is_using_fallback: bool,
}

impl<A: BinaryDollarApi + ?Sized> TokenManager<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            tokens: Vec::new(),
            new_token_name: String::new(),
            is_creating: false,
            visible_tokens: HashSet::new(),
            new_token: None,
            error: None,
            is_using_fallback: false,
        }
    }

    pub fn tokens(&self) -> &[ApiToken] {
        &self.tokens
    }

    /// Token at a 1-based position in the current list.
    pub fn token_at(&self, position: usize) -> Option<&ApiToken> {
        position
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    pub fn new_token_name(&self) -> &str {
        &self.new_token_name
    }

    pub fn set_new_token_name(&mut self, name: impl Into<String>) {
        self.new_token_name = name.into();
    }

    pub const fn is_creating(&self) -> bool {
        self.is_creating
    }

    /// Full secret of the last created token. Shown once.
    pub fn new_token(&self) -> Option<&str> {
        self.new_token.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn is_using_fallback(&self) -> bool {
        self.is_using_fallback
    }

    pub fn can_create(&self) -> bool {
        !self.is_creating && !self.new_token_name.trim().is_empty()
    }

    /// Reloads the token list.
    pub async fn fetch_tokens(&mut self) {
        self.error = None;
        match self.api.list_tokens().await {
            Ok(data) => {
                if data.success {
                    self.tokens = data.tokens;
                    self.is_using_fallback = data.source == Some(DataSource::Fallback);
                }
            }
            Err(e) => {
                error!("Failed to fetch tokens from Binary Dollar: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Issues a token named after the pending name, then reloads the list.
    ///
    /// Does nothing while the pending name is blank.
    pub async fn create_token(&mut self) {
        if self.new_token_name.trim().is_empty() {
            return;
        }

        self.is_creating = true;
        self.error = None;

        match self.api.create_token(&self.new_token_name).await {
            Ok(data) => {
                if data.success {
                    self.new_token = Some(data.token.token);
                    self.new_token_name.clear();
                    self.is_using_fallback = data.source == Some(DataSource::Fallback);
                    self.fetch_tokens().await;
                }
            }
            Err(e) => {
                error!("Failed to create token on Binary Dollar: {e}");
                self.error = Some(e.to_string());
            }
        }

        self.is_creating = false;
    }

    /// Revokes by secret, then reloads the list.
    pub async fn revoke_token(&mut self, token: &str) {
        self.error = None;
        match self.api.revoke_token(token).await {
            Ok(_) => self.fetch_tokens().await,
            Err(e) => {
                error!("Failed to revoke token on Binary Dollar: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Flips the reveal toggle for a token. Returns the new toggle state.
    pub fn toggle_visibility(&mut self, id: Uuid) -> bool {
        if self.visible_tokens.remove(&id) {
            false
        } else {
            self.visible_tokens.insert(id);
            true
        }
    }

    pub fn is_visible(&self, id: Uuid) -> bool {
        self.visible_tokens.contains(&id)
    }

    /// Text shown for a listed token.
    ///
    /// Listed secrets arrive masked, so the reveal toggle has nothing more to
    /// show and both states render the same value.
    #[allow(clippy::unused_self)]
    pub fn display_token<'a>(&self, token: &'a ApiToken) -> &'a str {
        &token.token
    }

    /// Copies a value, recording a failure like any other error.
    pub fn copy_text(&mut self, clipboard: &mut dyn Clipboard, text: &str) {
        if let Err(e) = clipboard.write_text(text) {
            warn!("Clipboard write failed: {e}");
            self.error = Some(format!("Failed to copy: {e}"));
        }
    }
}
