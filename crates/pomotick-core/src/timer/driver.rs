//! The serialized event loop between the presentation layer, the tick source
//! and the engine.
//!
//! Commands and heartbeats are handled one at a time, each to completion, so
//! the engine needs no locking. After every handled input the derived
//! [`TimerView`] is republished on a watch channel and any [`Event`] is
//! broadcast.

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use super::engine::{Command, TimerEngine};
use super::tick::Heartbeats;
use super::view::TimerView;
use crate::events::Event;

const EVENT_CAPACITY: usize = 32;

pub struct TimerDriver {
    engine: TimerEngine,
    heartbeats: Heartbeats,
    commands: mpsc::UnboundedReceiver<Command>,
    view: watch::Sender<TimerView>,
    events: broadcast::Sender<Event>,
}

/// Presentation-side handle: four commands in, view and events out.
///
/// The driver stops once every handle has been dropped.
#[derive(Clone)]
pub struct TimerHandle {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<TimerView>,
    events: broadcast::Sender<Event>,
}

impl TimerDriver {
    pub fn new(engine: TimerEngine, heartbeats: Heartbeats) -> (Self, TimerHandle) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(engine.view());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let handle = TimerHandle {
            commands: cmd_tx,
            view: view_rx,
            events: events.clone(),
        };
        let driver = Self {
            engine,
            heartbeats,
            commands: cmd_rx,
            view: view_tx,
            events,
        };
        (driver, handle)
    }

    /// Spawn the loop on the current runtime. The join handle yields the
    /// engine back once the loop ends.
    pub fn spawn(engine: TimerEngine, heartbeats: Heartbeats) -> (TimerHandle, JoinHandle<TimerEngine>) {
        let (driver, handle) = Self::new(engine, heartbeats);
        (handle, tokio::spawn(driver.run()))
    }

    pub async fn run(mut self) -> TimerEngine {
        loop {
            let event = tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => {
                        tracing::debug!(?command, "command");
                        self.engine.apply(command)
                    }
                    None => break,
                },
                beat = self.heartbeats.recv() => match beat {
                    Some(_) => self.engine.on_tick(),
                    None => {
                        tracing::warn!("tick source closed");
                        break;
                    }
                },
            };

            if let Some(event) = event {
                // No subscribers is fine.
                let _ = self.events.send(event);
            }
            self.view.send_replace(self.engine.view());
        }

        tracing::debug!("timer driver stopped");
        self.engine
    }
}

impl TimerHandle {
    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!(?command, "timer driver has stopped; command dropped");
        }
    }

    pub fn start(&self) {
        self.send(Command::Start);
    }

    pub fn pause(&self) {
        self.send(Command::Pause);
    }

    pub fn reset(&self) {
        self.send(Command::Reset);
    }

    pub fn set_duration(&self, minutes: i64) {
        self.send(Command::SetDuration(minutes));
    }

    /// The latest published view.
    pub fn view(&self) -> TimerView {
        self.view.borrow().clone()
    }

    /// Wait for the next published view. `None` once the driver has stopped.
    pub async fn changed(&mut self) -> Option<TimerView> {
        self.view.changed().await.ok()?;
        Some(self.view.borrow_and_update().clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}
