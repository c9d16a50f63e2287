//! Timer engine implementation.
//!
//! The engine is a wall-clock-based state machine. While running it keeps the
//! absolute instant at which the session reaches zero and derives the remaining
//! time from it on every heartbeat, so a late, throttled or missed heartbeat
//! never makes the countdown drift.
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Running -> (Paused -> Running)* -> Finished
//!   ^                                            |
//!   +--------------- reset / set_duration -------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::restore(parts, config.timer.duration_minutes());
//! engine.start();
//! // On every heartbeat:
//! engine.on_tick(); // Returns Some(Event::TimerCompleted) once per session
//! ```

use std::sync::Arc;

use chrono::Utc;

use super::clock::Clock;
use super::tick::TickControl;
use super::view::{progress, TimerView};
use crate::events::Event;
use crate::notify::{AudioSink, CompletionMessage, Notifier};
use crate::storage::snapshot::{clamp_minutes, SessionSnapshot, SECONDS_PER_MINUTE};
use crate::storage::SessionStore;

const MS_PER_SECOND: i64 = 1000;

/// Presentation-layer commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    /// Minutes; clamped to 1..=120.
    SetDuration(i64),
}

/// Everything the engine talks to.
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub ticks: Box<dyn TickControl>,
    pub store: Box<dyn SessionStore>,
    pub notifier: Box<dyn Notifier>,
    pub audio: Box<dyn AudioSink>,
}

/// Core timer engine.
///
/// Commands return immediately. All side effects on collaborators are fire and
/// forget; none of them can fail the engine.
pub struct TimerEngine {
    duration_secs: u32,
    remaining_secs: u32,
    /// Epoch ms at which the session reaches zero. `Some` exactly while running.
    target_end_ms: Option<i64>,
    /// Completion side effects already fired for this session.
    finished_notified: bool,
    message: CompletionMessage,
    clock: Arc<dyn Clock>,
    ticks: Box<dyn TickControl>,
    store: Box<dyn SessionStore>,
    notifier: Box<dyn Notifier>,
    audio: Box<dyn AudioSink>,
}

impl TimerEngine {
    /// Rebuild the session from the store.
    ///
    /// Without a stored session the engine starts ready with `default_minutes`.
    /// A stored running session whose end is still ahead resumes running (the
    /// tick source is started); one whose end has passed collapses to finished
    /// and the record is cleared, without firing completion side effects. A
    /// running record ending more than one session length from now cannot have
    /// been written by this engine; it is kept as paused at its stored value.
    pub fn restore(parts: Collaborators, default_minutes: u32) -> Self {
        let duration_secs = clamp_minutes(default_minutes as i64) * SECONDS_PER_MINUTE;
        let mut engine = Self {
            duration_secs,
            remaining_secs: duration_secs,
            target_end_ms: None,
            finished_notified: false,
            message: CompletionMessage::default(),
            clock: parts.clock,
            ticks: parts.ticks,
            store: parts.store,
            notifier: parts.notifier,
            audio: parts.audio,
        };

        let Some(snapshot) = engine.store.load() else {
            tracing::debug!("no stored session; starting fresh");
            return engine;
        };

        engine.duration_secs = snapshot.duration_seconds;
        match snapshot.target_end_time {
            Some(target) if snapshot.is_running => {
                let remaining = engine.remaining_until(target);
                if remaining > engine.duration_secs as i64 {
                    engine.remaining_secs = snapshot.remaining_seconds;
                    engine.persist();
                    tracing::warn!(target, "stored end time out of range; session paused");
                } else if remaining > 0 {
                    engine.remaining_secs = engine.cap(remaining);
                    engine.target_end_ms = Some(target);
                    engine.ticks.start();
                    tracing::info!(remaining = engine.remaining_secs, "resumed running session");
                } else {
                    engine.remaining_secs = 0;
                    engine.store.clear();
                    tracing::info!("stored session ended while away");
                }
            }
            _ => {
                engine.remaining_secs = snapshot.remaining_seconds;
                tracing::debug!(remaining = engine.remaining_secs, "restored paused session");
            }
        }
        engine
    }

    /// Replace the completion notification text.
    pub fn with_message(mut self, message: CompletionMessage) -> Self {
        self.message = message;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.target_end_ms.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_secs == 0
    }

    pub fn target_end_ms(&self) -> Option<i64> {
        self.target_end_ms
    }

    /// 0.0 .. 1.0 progress within the session.
    pub fn progress(&self) -> f64 {
        progress(self.duration_secs, self.remaining_secs)
    }

    pub fn view(&self) -> TimerView {
        TimerView::from_state(self.duration_secs, self.remaining_secs, self.is_running())
    }

    /// The record persisted for this state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            duration_seconds: self.duration_secs,
            remaining_seconds: self.remaining_secs,
            is_running: self.is_running(),
            target_end_time: self.target_end_ms,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn apply(&mut self, command: Command) -> Option<Event> {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Reset => self.reset(),
            Command::SetDuration(minutes) => self.set_duration(minutes),
        }
    }

    /// Begin (or re-anchor) the countdown. A finished session does not start.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_finished() {
            tracing::debug!("start ignored: session finished");
            return None;
        }

        let permission = self.notifier.request_permission();
        tracing::trace!(?permission, "notification permission");

        let target = self
            .clock
            .now_ms()
            .saturating_add(self.remaining_secs as i64 * MS_PER_SECOND);
        self.target_end_ms = Some(target);
        self.finished_notified = false;
        self.ticks.start();
        self.persist();

        Some(Event::TimerStarted {
            remaining_secs: self.remaining_secs,
            target_end_ms: target,
            at: Utc::now(),
        })
    }

    /// Freeze the countdown at its current value. No-op when not running.
    pub fn pause(&mut self) -> Option<Event> {
        let target = self.target_end_ms?;

        let remaining = self.remaining_until(target);
        if remaining <= 0 {
            return self.complete();
        }

        self.remaining_secs = self.cap(remaining);
        self.target_end_ms = None;
        self.ticks.stop();
        self.persist();

        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Back to a full, unstarted session of the configured length.
    pub fn reset(&mut self) -> Option<Event> {
        self.ticks.stop();
        self.target_end_ms = None;
        self.remaining_secs = self.duration_secs;
        self.finished_notified = false;
        self.store.clear();

        Some(Event::TimerReset {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        })
    }

    /// Change the session length. Ignored while running; always yields a fresh
    /// unstarted session otherwise.
    pub fn set_duration(&mut self, minutes: i64) -> Option<Event> {
        if self.is_running() {
            tracing::debug!(minutes, "set_duration ignored while running");
            return None;
        }

        self.duration_secs = clamp_minutes(minutes) * SECONDS_PER_MINUTE;
        self.remaining_secs = self.duration_secs;
        self.persist();

        Some(Event::DurationChanged {
            duration_secs: self.duration_secs,
            at: Utc::now(),
        })
    }

    /// Heartbeat handler. Returns `Some(Event::TimerCompleted)` when the
    /// session reaches zero.
    pub fn on_tick(&mut self) -> Option<Event> {
        let Some(target) = self.target_end_ms else {
            tracing::trace!("heartbeat while stopped; ignored");
            return None;
        };

        let remaining = self.remaining_until(target);
        if remaining <= 0 {
            return self.complete();
        }

        self.remaining_secs = self.cap(remaining);
        self.persist();
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Option<Event> {
        self.remaining_secs = 0;
        self.target_end_ms = None;

        let event = if self.finished_notified {
            None
        } else {
            self.finished_notified = true;
            tracing::info!(duration = self.duration_secs, "session complete");
            self.audio.play_completion_sound();
            self.notifier.notify(&self.message.title, &self.message.body);
            Some(Event::TimerCompleted {
                duration_secs: self.duration_secs,
                at: Utc::now(),
            })
        };

        self.ticks.stop();
        self.store.clear();
        event
    }

    /// Whole seconds until `target`, rounded half up.
    fn remaining_until(&self, target: i64) -> i64 {
        let delta = target.saturating_sub(self.clock.now_ms());
        delta
            .saturating_add(MS_PER_SECOND / 2)
            .div_euclid(MS_PER_SECOND)
    }

    /// A positive remaining value never exceeds the session length, even if
    /// the clock stepped backwards.
    fn cap(&self, remaining: i64) -> u32 {
        remaining.clamp(0, self.duration_secs as i64) as u32
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        self.store.save(&snapshot);
    }
}
