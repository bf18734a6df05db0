//! UI state - status line, transient notices, and the find/replace bar

use std::time::{Duration, Instant};

use super::tab::TabId;
use crate::search::SearchOptions;

/// How long transient notices stay visible
pub const TRANSIENT_DURATION: Duration = Duration::from_secs(3);

/// State for the find/replace bar
#[derive(Debug, Clone, Default)]
pub struct FindReplaceState {
    pub visible: bool,
    /// Whether replace mode is active (vs find-only)
    pub replace_mode: bool,
    pub query: String,
    pub replacement: String,
    pub options: SearchOptions,
}

/// A transient status message that auto-expires
#[derive(Debug, Clone)]
pub struct TransientMessage {
    pub text: String,
    pub expires_at: Instant,
}

impl TransientMessage {
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Persistent status line
    pub status_message: String,
    /// Notice shown over the status line until it expires
    pub transient_message: Option<TransientMessage>,
    pub find_replace: FindReplaceState,
    /// Whether the file browser sidebar is shown
    pub sidebar_visible: bool,
    pub is_loading: bool,
    pub is_saving: bool,
    /// Modified tab waiting for a save/discard answer before closing
    pub pending_close: Option<TabId>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Show a short-lived notice
    pub fn notify(&mut self, message: impl Into<String>) {
        self.transient_message = Some(TransientMessage::new(message, TRANSIENT_DURATION));
    }

    /// The text currently shown in the status area
    pub fn visible_status(&self) -> &str {
        match &self.transient_message {
            Some(msg) if !msg.is_expired() => &msg.text,
            _ => &self.status_message,
        }
    }

    /// Drop an expired notice. Returns `true` if one was removed.
    pub fn expire_transient(&mut self) -> bool {
        if self.transient_message.as_ref().is_some_and(TransientMessage::is_expired) {
            self.transient_message = None;
            return true;
        }
        false
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading || self.is_saving
    }
}
