//! Background tick source.
//!
//! The tick source runs as its own tokio task so a busy or throttled caller
//! cannot stall the cadence. It shares no state with the engine; the two talk
//! over channels:
//!
//! ```text
//! TickHandle ──TickCommand::{Start, Stop}──> worker ──Heartbeat──> Heartbeats
//! ```
//!
//! Heartbeats carry no time value. Every started cadence gets a fresh epoch and
//! [`Heartbeats::recv`] drops beats from any epoch other than the current one,
//! so once [`TickHandle::stop`] returns, no beat from the old cadence is ever
//! delivered, even if it was already sitting in the channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// Heartbeat cadence.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Commands accepted by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCommand {
    Start { epoch: u64 },
    Stop,
}

/// "Time has advanced; re-evaluate."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    epoch: u64,
}

/// Start/stop control over a heartbeat source, as seen by the engine.
pub trait TickControl: Send {
    /// Emit one heartbeat now, then one per interval. Restarts a running cadence.
    fn start(&mut self);
    /// Cancel the cadence. Safe to call repeatedly.
    fn stop(&mut self);
}

/// Tick control for one-shot hosts that never wait for heartbeats.
#[derive(Debug, Default, Clone, Copy)]
pub struct Detached;

impl TickControl for Detached {
    fn start(&mut self) {}
    fn stop(&mut self) {}
}

/// Spawner for the heartbeat worker.
pub struct TickSource;

impl TickSource {
    /// Spawn a worker with the standard one-second cadence.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn() -> (TickHandle, Heartbeats) {
        Self::spawn_with_period(Duration::from_millis(TICK_INTERVAL_MS))
    }

    pub fn spawn_with_period(period: Duration) -> (TickHandle, Heartbeats) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (beat_tx, beat_rx) = mpsc::unbounded_channel();
        let epoch = Arc::new(AtomicU64::new(0));

        tokio::spawn(run_worker(period, cmd_rx, beat_tx));

        (
            TickHandle {
                commands: cmd_tx,
                epoch: Arc::clone(&epoch),
            },
            Heartbeats { rx: beat_rx, epoch },
        )
    }
}

/// Sending half: start/stop commands.
#[derive(Debug)]
pub struct TickHandle {
    commands: mpsc::UnboundedSender<TickCommand>,
    epoch: Arc<AtomicU64>,
}

impl TickHandle {
    fn send(&self, command: TickCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!(?command, "tick worker has exited; command dropped");
        }
    }
}

impl TickControl for TickHandle {
    fn start(&mut self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(epoch, "tick source start");
        self.send(TickCommand::Start { epoch });
    }

    fn stop(&mut self) {
        // Invalidate the running cadence before the worker even sees the command.
        self.epoch.fetch_add(1, Ordering::SeqCst);
        tracing::trace!("tick source stop");
        self.send(TickCommand::Stop);
    }
}

/// Receiving half: heartbeats of the current cadence.
#[derive(Debug)]
pub struct Heartbeats {
    rx: mpsc::UnboundedReceiver<Heartbeat>,
    epoch: Arc<AtomicU64>,
}

impl Heartbeats {
    /// Wait for the next live heartbeat. Returns `None` once the worker is gone.
    pub async fn recv(&mut self) -> Option<Heartbeat> {
        loop {
            let beat = self.rx.recv().await?;
            if beat.epoch == self.epoch.load(Ordering::SeqCst) {
                return Some(beat);
            }
            tracing::trace!(stale = beat.epoch, "dropping heartbeat from cancelled cadence");
        }
    }
}

async fn run_worker(
    period: Duration,
    mut commands: mpsc::UnboundedReceiver<TickCommand>,
    beats: mpsc::UnboundedSender<Heartbeat>,
) {
    let mut cadence: Option<(u64, Interval)> = None;

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(TickCommand::Start { epoch }) => {
                    // First tick of a fresh interval completes immediately.
                    let mut interval = tokio::time::interval(period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    cadence = Some((epoch, interval));
                }
                Some(TickCommand::Stop) => cadence = None,
                None => break,
            },
            epoch = next_tick(&mut cadence) => {
                if beats.send(Heartbeat { epoch }).is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!("tick worker exiting");
}

async fn next_tick(cadence: &mut Option<(u64, Interval)>) -> u64 {
    match cadence {
        Some((epoch, interval)) => {
            interval.tick().await;
            *epoch
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    #[tokio::test(start_paused = true)]
    async fn start_emits_immediately_then_every_second() {
        let (mut handle, mut beats) = TickSource::spawn();
        handle.start();

        let t0 = Instant::now();
        assert!(beats.recv().await.is_some());
        assert_eq!(Instant::now() - t0, Duration::ZERO);

        beats.recv().await.unwrap();
        assert_eq!(Instant::now() - t0, Duration::from_millis(1000));

        beats.recv().await.unwrap();
        assert_eq!(Instant::now() - t0, Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn no_heartbeat_after_stop() {
        let (mut handle, mut beats) = TickSource::spawn();
        handle.start();
        beats.recv().await.unwrap();

        handle.stop();
        let next = timeout(Duration::from_secs(5), beats.recv()).await;
        assert!(next.is_err(), "heartbeat delivered after stop");
    }

    #[tokio::test(start_paused = true)]
    async fn queued_heartbeat_is_dropped_after_stop() {
        let (mut handle, mut beats) = TickSource::spawn();
        handle.start();
        beats.recv().await.unwrap();

        // The beat at 1000 ms is sent but left unread in the channel.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.stop();

        let next = timeout(Duration::from_secs(5), beats.recv()).await;
        assert!(next.is_err(), "stale heartbeat delivered after stop");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_restartable() {
        let (mut handle, mut beats) = TickSource::spawn();
        handle.stop();
        handle.stop();
        assert!(timeout(Duration::from_secs(2), beats.recv()).await.is_err());

        handle.start();
        assert!(timeout(Duration::from_millis(1), beats.recv()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_cadence() {
        let (mut handle, mut beats) = TickSource::spawn();
        handle.start();
        beats.recv().await.unwrap();

        tokio::time::advance(Duration::from_millis(400)).await;
        handle.start();
        let t0 = Instant::now();
        beats.recv().await.unwrap();
        assert_eq!(Instant::now() - t0, Duration::ZERO);

        // Only the new cadence remains: one beat per second from the restart.
        let mut count = 0;
        while let Ok(Some(_)) = timeout(Duration::from_millis(3500), beats.recv()).await {
            count += 1;
            if Instant::now() - t0 >= Duration::from_millis(3000) {
                break;
            }
        }
        assert_eq!(count, 3);
        assert_eq!(Instant::now() - t0, Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn recv_returns_none_when_handle_dropped() {
        let (handle, mut beats) = TickSource::spawn();
        drop(handle);
        assert!(beats.recv().await.is_none());
    }
}
