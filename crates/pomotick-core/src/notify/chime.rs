//! The completion chime.
//!
//! Three ascending sine tones (C5, E5, G5), repeated once after a short pause.
//! Each tone ramps linearly from silence to 0.4 over 20 ms, holds, and fades
//! to silence over its last 100 ms. The phrase is rendered to 16-bit mono PCM,
//! wrapped in a WAV container and handed to whatever player the system has.

use std::f32::consts::TAU;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use super::AudioSink;
use crate::error::AudioError;

pub const SAMPLE_RATE: u32 = 44_100;

const PEAK_GAIN: f32 = 0.4;
const ATTACK_SECS: f32 = 0.02;
const RELEASE_SECS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub start_secs: f32,
    pub duration_secs: f32,
}

const fn tone(freq_hz: f32, start_secs: f32, duration_secs: f32) -> Tone {
    Tone {
        freq_hz,
        start_secs,
        duration_secs,
    }
}

pub const CHIME: [Tone; 6] = [
    tone(523.25, 0.0, 0.2),
    tone(659.25, 0.22, 0.2),
    tone(783.99, 0.44, 0.3),
    tone(523.25, 0.9, 0.2),
    tone(659.25, 1.12, 0.2),
    tone(783.99, 1.34, 0.3),
];

/// Gain of a tone `t` seconds after it starts.
pub fn envelope_gain(t: f32, duration: f32) -> f32 {
    if t <= 0.0 || t >= duration {
        0.0
    } else if t < ATTACK_SECS {
        PEAK_GAIN * t / ATTACK_SECS
    } else if t <= duration - RELEASE_SECS {
        PEAK_GAIN
    } else {
        PEAK_GAIN * (duration - t) / RELEASE_SECS
    }
}

/// Render the chime to signed 16-bit mono samples.
pub fn render_chime(sample_rate: u32) -> Vec<i16> {
    let end = CHIME
        .iter()
        .map(|t| t.start_secs + t.duration_secs)
        .fold(0.0f32, f32::max);
    let len = (end * sample_rate as f32).ceil() as usize;
    let mut mix = vec![0.0f32; len];

    for tone in &CHIME {
        let first = (tone.start_secs * sample_rate as f32) as usize;
        let count = (tone.duration_secs * sample_rate as f32) as usize;
        for i in 0..count {
            let Some(slot) = mix.get_mut(first + i) else {
                break;
            };
            let t = i as f32 / sample_rate as f32;
            *slot += envelope_gain(t, tone.duration_secs) * (TAU * tone.freq_hz * t).sin();
        }
    }

    mix.into_iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// Wrap PCM samples in a canonical 44-byte-header WAV container.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS: u16 = 16;
    let block_align = CHANNELS * BITS / 8;
    let data_len = (samples.len() * 2) as u32;

    let mut out = Vec::with_capacity(44 + data_len as usize);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

#[cfg(target_os = "macos")]
const DEFAULT_PLAYERS: &[&str] = &["afplay"];
#[cfg(not(target_os = "macos"))]
const DEFAULT_PLAYERS: &[&str] = &["paplay", "pw-play", "aplay"];

/// The encoded chime, rendered on first use.
pub fn chime_wav() -> &'static [u8] {
    static WAV: OnceLock<Vec<u8>> = OnceLock::new();
    WAV.get_or_init(|| encode_wav(&render_chime(SAMPLE_RATE), SAMPLE_RATE))
}

/// Plays the chime through an external player process.
#[derive(Debug, Clone)]
pub struct ChimePlayer {
    enabled: bool,
    player: Option<String>,
}

impl ChimePlayer {
    /// `player` overrides autodetection.
    pub fn new(enabled: bool, player: Option<String>) -> Self {
        Self { enabled, player }
    }

    /// Write the chime as a WAV file.
    pub fn write_wav(path: &Path) -> Result<(), AudioError> {
        std::fs::write(path, chime_wav()).map_err(|source| AudioError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Play the chime and wait for the player to finish.
    ///
    /// The WAV goes to a freshly created temp file that is removed afterwards.
    pub fn play(&self) -> Result<(), AudioError> {
        let write_failed = |source: std::io::Error| AudioError::WriteFailed {
            path: std::env::temp_dir(),
            source,
        };
        let mut file = tempfile::Builder::new()
            .prefix("pomotick-chime-")
            .suffix(".wav")
            .tempfile()
            .map_err(write_failed)?;
        file.write_all(chime_wav())
            .and_then(|()| file.flush())
            .map_err(write_failed)?;

        let candidates: Vec<&str> = match &self.player {
            Some(p) => vec![p.as_str()],
            None => DEFAULT_PLAYERS.to_vec(),
        };

        for player in &candidates {
            let spawned = Command::new(player)
                .arg(file.path())
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(mut child) => {
                    tracing::debug!(player, "playing completion chime");
                    let status = child.wait().map_err(|source| AudioError::SpawnFailed {
                        player: player.to_string(),
                        source,
                    })?;
                    if !status.success() {
                        tracing::warn!(player, %status, "audio player exited with failure");
                    }
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(AudioError::SpawnFailed {
                        player: player.to_string(),
                        source,
                    })
                }
            }
        }

        Err(AudioError::NoPlayer {
            tried: candidates.join(", "),
        })
    }
}

impl AudioSink for ChimePlayer {
    fn play_completion_sound(&self) {
        if !self.enabled {
            return;
        }

        let player = self.clone();
        // Rendering, file IO and playback all stay off the caller's thread.
        let spawned = std::thread::Builder::new()
            .name("pomotick-chime".into())
            .spawn(move || {
                if let Err(e) = player.play() {
                    tracing::warn!(error = %e, "audio playback failed");
                }
            });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to spawn audio thread");
        }
    }
}
