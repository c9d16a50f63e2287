//! The single durable slot holding the last session snapshot.
//!
//! Stores never report errors to the engine. A store that cannot read returns
//! `None`; a store that cannot write logs and carries on.

use std::sync::{Arc, Mutex};

use super::database::Database;
use super::snapshot::SessionSnapshot;

/// Key of the session record in the kv table.
pub const SESSION_KEY: &str = "pomodoro_timer_state";

pub trait SessionStore: Send {
    fn load(&self) -> Option<SessionSnapshot>;
    fn save(&mut self, snapshot: &SessionSnapshot);
    fn clear(&mut self);
}

/// Snapshot slot in the SQLite kv table.
pub struct KvSessionStore {
    db: Database,
}

impl KvSessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl SessionStore for KvSessionStore {
    fn load(&self) -> Option<SessionSnapshot> {
        match self.db.kv_get(SESSION_KEY) {
            Ok(Some(raw)) => SessionSnapshot::decode(&raw),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable; starting fresh");
                None
            }
        }
    }

    fn save(&mut self, snapshot: &SessionSnapshot) {
        if let Err(e) = self.db.kv_set(SESSION_KEY, &snapshot.encode()) {
            tracing::warn!(error = %e, "failed to persist session snapshot");
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.db.kv_delete(SESSION_KEY) {
            tracing::warn!(error = %e, "failed to clear session snapshot");
        }
    }
}

/// In-process slot. Clones share the slot, so a test can inspect what the
/// engine wrote.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a raw record (which may be garbage).
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    pub fn with_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self::with_raw(snapshot.encode())
    }

    /// The raw stored record, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.raw().is_none()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Option<SessionSnapshot> {
        self.raw().as_deref().and_then(SessionSnapshot::decode)
    }

    fn save(&mut self, snapshot: &SessionSnapshot) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = Some(snapshot.encode()),
            Err(_) => tracing::warn!("memory store poisoned; snapshot not saved"),
        }
    }

    fn clear(&mut self) {
        match self.slot.lock() {
            Ok(mut slot) => *slot = None,
            Err(_) => tracing::warn!("memory store poisoned; snapshot not cleared"),
        }
    }
}
