//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pomotick_core::{AudioSink, Clock, Notifier, Permission};

/// Wall clock that follows tokio's (pausable) clock.
#[derive(Clone)]
pub struct TokioClock {
    base_ms: i64,
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new(base_ms: i64) -> Self {
        Self {
            base_ms,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> i64 {
        self.base_ms + self.origin.elapsed().as_millis() as i64
    }
}

/// Records notifications and permission requests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub permission_requests: Arc<AtomicUsize>,
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn request_permission(&self) -> Permission {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Permission::Granted
    }

    fn notify(&self, title: &str, body: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

#[derive(Clone, Default)]
pub struct CountingAudio(pub Arc<AtomicUsize>);

impl CountingAudio {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl AudioSink for CountingAudio {
    fn play_completion_sound(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
