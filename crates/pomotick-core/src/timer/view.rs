//! Read-only values the presentation layer renders.
//!
//! Everything here is recomputed from `(duration, remaining, running)`; none of
//! it is stored.

use serde::{Deserialize, Serialize};

use crate::storage::snapshot::SECONDS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Full session ahead, not started.
    Ready,
    Running,
    /// Stopped part-way.
    Paused,
    /// Counted down to zero.
    Finished,
}

impl SessionStatus {
    pub fn from_state(duration_secs: u32, remaining_secs: u32, is_running: bool) -> Self {
        if is_running {
            SessionStatus::Running
        } else if remaining_secs == 0 {
            SessionStatus::Finished
        } else if remaining_secs >= duration_secs {
            SessionStatus::Ready
        } else {
            SessionStatus::Paused
        }
    }

    /// Headline shown above the clock. Depends only on whether the session
    /// is running and whether it has reached zero.
    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Finished => "Complete",
            SessionStatus::Running => "Focusing",
            SessionStatus::Ready | SessionStatus::Paused => "Ready",
        }
    }
}

/// Snapshot of everything a view needs to draw the timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    /// Two-digit zero-padded minutes.
    pub minutes: String,
    /// Two-digit zero-padded seconds.
    pub seconds: String,
    pub is_running: bool,
    pub remaining_seconds: u32,
    /// 0.0 at the start of a session, 1.0 at completion.
    pub progress: f64,
    pub duration_minutes: u32,
    pub status: SessionStatus,
    pub label: String,
    /// Window/tab title.
    pub title: String,
}

impl TimerView {
    pub fn from_state(duration_secs: u32, remaining_secs: u32, is_running: bool) -> Self {
        let minutes = format!("{:02}", remaining_secs / SECONDS_PER_MINUTE);
        let seconds = format!("{:02}", remaining_secs % SECONDS_PER_MINUTE);
        let status = SessionStatus::from_state(duration_secs, remaining_secs, is_running);
        let title = match status {
            SessionStatus::Running => format!("({minutes}:{seconds}) Focus — Pomodoro"),
            SessionStatus::Finished => "Break Time! — Pomodoro".to_string(),
            _ => format!("{minutes}:{seconds} — Pomodoro"),
        };

        Self {
            progress: progress(duration_secs, remaining_secs),
            duration_minutes: duration_secs / SECONDS_PER_MINUTE,
            label: status.label().to_string(),
            minutes,
            seconds,
            is_running,
            remaining_seconds: remaining_secs,
            status,
            title,
        }
    }

    /// `MM:SS`
    pub fn clock(&self) -> String {
        format!("{}:{}", self.minutes, self.seconds)
    }
}

/// `1 - remaining / duration`, clamped to 0.0..=1.0.
pub fn progress(duration_secs: u32, remaining_secs: u32) -> f64 {
    if duration_secs == 0 {
        return 1.0;
    }
    (1.0 - remaining_secs as f64 / duration_secs as f64).clamp(0.0, 1.0)
}
