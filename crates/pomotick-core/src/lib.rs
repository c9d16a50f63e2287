//! # Pomotick Core Library
//!
//! Core logic of the Pomotick focus timer: one countdown session with
//! start/pause/reset, a configurable length, progress feedback and a
//! notification plus chime on completion. Hosts (the terminal CLI, or any other
//! view) only render [`TimerView`] and send the four commands.
//!
//! ## Architecture
//!
//! - **Timer Engine**: owns the session, derives remaining time from an
//!   absolute end timestamp, fires completion side effects once per session
//! - **Tick Source**: background heartbeat task, driven purely by messages
//! - **Driver**: serialized loop feeding commands and heartbeats to the engine
//! - **Storage**: single-slot session snapshot in SQLite, TOML configuration
//! - **Notify**: desktop notification and synthesized completion chime
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TickSource`]: Heartbeat worker
//! - [`TimerDriver`] / [`TimerHandle`]: Event loop and its presentation-side handle
//! - [`SessionStore`]: Persistence slot
//! - [`Config`]: Application configuration management

pub mod app;
pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod timer;

pub use error::{AudioError, ConfigError, DatabaseError};
pub use events::Event;
pub use notify::{AudioSink, CompletionMessage, Notifier, Permission};
pub use storage::{Config, Database, KvSessionStore, MemoryStore, SessionSnapshot, SessionStore};
pub use timer::{
    Clock, Collaborators, Command, ManualClock, SessionStatus, SystemClock, TickControl,
    TickSource, TimerDriver, TimerEngine, TimerHandle, TimerView,
};
