//! Completion collaborators: desktop notification and the chime.
//!
//! Both are best effort. Nothing here may block the caller or report an error
//! back into the timer.

mod chime;
mod desktop;

pub use chime::{
    chime_wav, encode_wav, envelope_gain, render_chime, ChimePlayer, Tone, CHIME, SAMPLE_RATE,
};
pub use desktop::DesktopNotifier;

use serde::{Deserialize, Serialize};

/// Outcome of asking for notification permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not decided yet; notifications are skipped until granted.
    Default,
}

pub trait Notifier: Send {
    /// Ask for permission to notify. Called on every start; the timer ignores
    /// the answer.
    fn request_permission(&self) -> Permission;
    /// Show a notification. A no-op without permission.
    fn notify(&self, title: &str, body: &str);
}

pub trait AudioSink: Send {
    fn play_completion_sound(&self);
}

/// Notifier for hosts without a notification facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    fn notify(&self, _title: &str, _body: &str) {}
}

/// Audio sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play_completion_sound(&self) {}
}

/// Title and body of the completion notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub title: String,
    pub body: String,
}

impl Default for CompletionMessage {
    fn default() -> Self {
        Self {
            title: "Pomodoro Complete! 🎉".into(),
            body: "Great work! Time to take a break.".into(),
        }
    }
}
