mod config;
pub mod database;
pub mod session_store;
pub mod snapshot;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::Database;
pub use session_store::{KvSessionStore, MemoryStore, SessionStore, SESSION_KEY};
pub use snapshot::SessionSnapshot;

use std::path::PathBuf;

/// Returns `~/.config/pomotick[-dev]/` based on POMOTICK_ENV.
///
/// Set POMOTICK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotick-dev")
    } else {
        base_dir.join("pomotick")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
