//! UI interaction state

use serde_json::Value;
use std::time::Instant;

use crate::constants::status::STATUS_DURATION;
use crate::error::PlotError;
use crate::state::ZoomKey;

/// Error shown in the banner above the charts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub title: String,
    pub message: String,
}

/// Confirmation shown next to the toolbar until it expires
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub shown_at: Instant,
}

/// UI state: pending renderer payloads, banner and dialogs
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Raw payload emitted by the renderer and the view it was emitted for,
    /// consumed by the next render pass
    pub pending_event: Option<(ZoomKey, Value)>,

    /// Set whenever an input of the render pass changed
    pub needs_render: bool,

    /// Error message to display in UI
    pub error: Option<ErrorBanner>,

    /// Short confirmation shown in the toolbar (e.g. after a copy)
    pub status: Option<StatusMessage>,

    /// Show help panel
    pub show_help: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            needs_render: true,
            ..Self::default()
        }
    }

    /// Queue a payload emitted by the view drawn for `key`. Only the latest
    /// payload of a frame is kept.
    pub fn push_event(&mut self, key: ZoomKey, payload: Value) {
        self.pending_event = Some((key, payload));
        self.needs_render = true;
    }

    /// Take the pending payload, if any
    pub fn take_event(&mut self) -> Option<(ZoomKey, Value)> {
        self.pending_event.take()
    }

    pub fn set_status(&mut self, text: impl Into<String>, now: Instant) {
        self.status = Some(StatusMessage {
            text: text.into(),
            shown_at: now,
        });
    }

    /// Drop the status message once it has been shown long enough
    pub fn expire_status(&mut self, now: Instant) {
        if self
            .status
            .as_ref()
            .is_some_and(|s| now.saturating_duration_since(s.shown_at) >= STATUS_DURATION)
        {
            self.status = None;
        }
    }

    pub fn invalidate(&mut self) {
        self.needs_render = true;
    }

    /// Show a typed error
    pub fn report(&mut self, error: &PlotError) {
        self.error = Some(ErrorBanner {
            title: error.title().to_string(),
            message: error.user_message(),
        });
    }

    /// Set an error message
    pub fn set_error(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.error = Some(ErrorBanner {
            title: title.into(),
            message: message.into(),
        });
    }

    /// Clear the current error message
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
