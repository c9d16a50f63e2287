//! Integration tests for restoring a session from the on-disk store.

mod common;

use std::path::Path;
use std::sync::Arc;

use common::CountingAudio;
use pomotick_core::notify::NoopNotifier;
use pomotick_core::storage::SESSION_KEY;
use pomotick_core::timer::Detached;
use pomotick_core::{
    Collaborators, Database, KvSessionStore, ManualClock, SessionSnapshot, TimerEngine,
};

const T0: i64 = 1_700_000_000_000;

fn engine_at(path: &Path, clock: &ManualClock, audio: &CountingAudio) -> TimerEngine {
    let db = Database::open_at(path).unwrap();
    TimerEngine::restore(
        Collaborators {
            clock: Arc::new(clock.clone()),
            ticks: Box::new(Detached),
            store: Box::new(KvSessionStore::new(db)),
            notifier: Box::new(NoopNotifier),
            audio: Box::new(audio.clone()),
        },
        25,
    )
}

fn seed(path: &Path, raw: &str) {
    Database::open_at(path).unwrap().kv_set(SESSION_KEY, raw).unwrap();
}

fn stored(path: &Path) -> Option<String> {
    Database::open_at(path).unwrap().kv_get(SESSION_KEY).unwrap()
}

#[test]
fn running_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");
    let clock = ManualClock::new(T0);
    let audio = CountingAudio::default();

    {
        let mut engine = engine_at(&path, &clock, &audio);
        engine.set_duration(10);
        engine.start();
        clock.advance_secs(120);
        engine.on_tick();
        assert_eq!(engine.remaining_secs(), 480);
    }

    // Four minutes pass while the process is gone.
    clock.advance_secs(240);
    let engine = engine_at(&path, &clock, &audio);
    assert!(engine.is_running());
    assert_eq!(engine.duration_secs(), 600);
    assert_eq!(engine.remaining_secs(), 240);
    assert_eq!(engine.target_end_ms(), Some(T0 + 600_000));
}

#[test]
fn expired_session_collapses_and_clears_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");
    let clock = ManualClock::new(T0);
    let audio = CountingAudio::default();

    seed(
        &path,
        &SessionSnapshot::normalized(1500, 900, true, Some(T0 - 10_000)).encode(),
    );

    let engine = engine_at(&path, &clock, &audio);
    assert_eq!(engine.remaining_secs(), 0);
    assert!(!engine.is_running());
    assert_eq!(engine.view().label, "Complete");
    assert!(stored(&path).is_none());
    assert_eq!(audio.count(), 0);
}

#[test]
fn session_ending_in_37_seconds_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");
    let clock = ManualClock::new(T0);

    seed(
        &path,
        &SessionSnapshot::normalized(1500, 900, true, Some(T0 + 37_000)).encode(),
    );

    let engine = engine_at(&path, &clock, &CountingAudio::default());
    assert_eq!(engine.remaining_secs(), 37);
    assert!(engine.is_running());
}

#[test]
fn paused_session_and_duration_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");
    let clock = ManualClock::new(T0);
    let audio = CountingAudio::default();

    {
        let mut engine = engine_at(&path, &clock, &audio);
        engine.set_duration(45);
        engine.start();
        clock.advance_secs(300);
        engine.pause();
    }

    clock.advance_secs(10_000);
    let engine = engine_at(&path, &clock, &audio);
    assert!(!engine.is_running());
    assert_eq!(engine.duration_secs(), 2700);
    assert_eq!(engine.remaining_secs(), 2400);
}

#[test]
fn reset_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");
    let clock = ManualClock::new(T0);
    let audio = CountingAudio::default();

    let mut engine = engine_at(&path, &clock, &audio);
    engine.start();
    assert!(stored(&path).is_some());
    engine.reset();
    assert!(stored(&path).is_none());
}

#[test]
fn widget_record_is_understood() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");
    let clock = ManualClock::new(T0);

    seed(
        &path,
        r#"{"timeLeft":600,"isRunning":false,"targetEndTime":null,"durationMinutes":15}"#,
    );

    let engine = engine_at(&path, &clock, &CountingAudio::default());
    assert_eq!(engine.duration_secs(), 900);
    assert_eq!(engine.remaining_secs(), 600);
    assert_eq!(engine.view().clock(), "10:00");
}

#[test]
fn corrupt_record_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomotick.db");
    seed(&path, "\u{0}\u{1}garbage");

    let engine = engine_at(&path, &ManualClock::new(T0), &CountingAudio::default());
    assert_eq!(engine.duration_secs(), 1500);
    assert_eq!(engine.remaining_secs(), 1500);
    assert!(!engine.is_running());
}
