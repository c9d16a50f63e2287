//! Wiring of the production collaborators.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::notify::{ChimePlayer, DesktopNotifier};
use crate::storage::{Config, Database, KvSessionStore, MemoryStore, SessionStore};
use crate::timer::{
    Collaborators, Detached, SystemClock, TickControl, TickSource, TimerDriver, TimerEngine,
    TimerHandle,
};

/// The on-disk session store, or an in-memory one if the database cannot be
/// opened. Losing persistence never stops the timer.
pub fn open_store() -> Box<dyn SessionStore> {
    match Database::open() {
        Ok(db) => Box::new(KvSessionStore::new(db)),
        Err(e) => {
            tracing::warn!(error = %e, "session storage unavailable; state will not survive restart");
            Box::new(MemoryStore::new())
        }
    }
}

fn collaborators(
    config: &Config,
    ticks: Box<dyn TickControl>,
    store: Box<dyn SessionStore>,
) -> Collaborators {
    Collaborators {
        clock: Arc::new(SystemClock),
        ticks,
        store,
        notifier: Box::new(DesktopNotifier::new(config.notifications.enabled)),
        audio: Box::new(ChimePlayer::new(
            config.notifications.sound_enabled,
            config.notifications.player.clone(),
        )),
    }
}

/// Restore an engine without a tick source, for one-shot commands.
pub fn restore_detached(config: &Config, store: Box<dyn SessionStore>) -> TimerEngine {
    TimerEngine::restore(
        collaborators(config, Box::new(Detached), store),
        config.timer.duration_minutes(),
    )
    .with_message(config.notifications.message())
}

/// Restore the session, start the tick source and spawn the driver loop.
///
/// Must be called from within a tokio runtime.
pub fn launch(
    config: &Config,
    store: Box<dyn SessionStore>,
) -> (TimerHandle, JoinHandle<TimerEngine>) {
    let (ticks, heartbeats) = TickSource::spawn();
    let engine = TimerEngine::restore(
        collaborators(config, Box::new(ticks), store),
        config.timer.duration_minutes(),
    )
    .with_message(config.notifications.message());
    TimerDriver::spawn(engine, heartbeats)
}
