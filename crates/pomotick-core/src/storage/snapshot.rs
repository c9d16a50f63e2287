//! Persisted session snapshot and its JSON codec.
//!
//! ```json
//! { "durationSeconds": 1500, "remainingSeconds": 812, "isRunning": true, "targetEndTime": 1767225600000 }
//! ```
//!
//! Records written by the earlier browser widget
//! (`{timeLeft, isRunning, targetEndTime, durationMinutes}`) decode too.
//! Anything else is treated as "no prior session".

use serde::{Deserialize, Serialize};

pub const MIN_DURATION_MINUTES: u32 = 1;
pub const MAX_DURATION_MINUTES: u32 = 120;
pub const DEFAULT_DURATION_MINUTES: u32 = 25;
pub const SECONDS_PER_MINUTE: u32 = 60;

pub const MIN_DURATION_SECS: u32 = MIN_DURATION_MINUTES * SECONDS_PER_MINUTE;
pub const MAX_DURATION_SECS: u32 = MAX_DURATION_MINUTES * SECONDS_PER_MINUTE;

/// Clamp a requested session length to the supported 1..=120 minutes.
pub fn clamp_minutes(minutes: i64) -> u32 {
    minutes.clamp(MIN_DURATION_MINUTES as i64, MAX_DURATION_MINUTES as i64) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub duration_seconds: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
    /// Epoch milliseconds; present only while running.
    pub target_end_time: Option<i64>,
}

/// Shape of the record the browser widget stored under the same key.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySnapshot {
    time_left: i64,
    #[serde(default)]
    is_running: bool,
    #[serde(default)]
    target_end_time: Option<i64>,
    #[serde(default)]
    duration_minutes: Option<i64>,
}

/// Either layout, before normalization. Current layout is tried first.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnySnapshot {
    Current {
        #[serde(rename = "durationSeconds")]
        duration_seconds: i64,
        #[serde(rename = "remainingSeconds")]
        remaining_seconds: i64,
        #[serde(rename = "isRunning", default)]
        is_running: bool,
        #[serde(rename = "targetEndTime", default)]
        target_end_time: Option<i64>,
    },
    Legacy(LegacySnapshot),
}

impl SessionSnapshot {
    /// Build a snapshot from raw (possibly out-of-range) values.
    ///
    /// Duration is clamped to 60..=7200 seconds, remaining to 0..=duration,
    /// and a running record without a positive target is downgraded to paused.
    pub fn normalized(
        duration_seconds: i64,
        remaining_seconds: i64,
        is_running: bool,
        target_end_time: Option<i64>,
    ) -> Self {
        let duration =
            duration_seconds.clamp(MIN_DURATION_SECS as i64, MAX_DURATION_SECS as i64) as u32;
        let remaining = remaining_seconds.clamp(0, duration as i64) as u32;
        let (is_running, target_end_time) = match (is_running, target_end_time) {
            (true, Some(target)) if target > 0 => (true, Some(target)),
            _ => (false, None),
        };
        Self {
            duration_seconds: duration,
            remaining_seconds: remaining,
            is_running,
            target_end_time,
        }
    }

    pub fn encode(&self) -> String {
        // A struct of plain integers and bools always serializes.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decode a stored record. `None` for anything unreadable.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str::<AnySnapshot>(raw) {
            Ok(AnySnapshot::Current {
                duration_seconds,
                remaining_seconds,
                is_running,
                target_end_time,
            }) => Some(Self::normalized(
                duration_seconds,
                remaining_seconds,
                is_running,
                target_end_time,
            )),
            Ok(AnySnapshot::Legacy(legacy)) => {
                let minutes = legacy
                    .duration_minutes
                    .unwrap_or(DEFAULT_DURATION_MINUTES as i64);
                Some(Self::normalized(
                    minutes.saturating_mul(SECONDS_PER_MINUTE as i64),
                    legacy.time_left,
                    legacy.is_running,
                    legacy.target_end_time,
                ))
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session snapshot");
                None
            }
        }
    }
}
