mod clock;
mod driver;
mod engine;
mod tick;
mod view;

pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{TimerDriver, TimerHandle};
pub use engine::{Collaborators, Command, TimerEngine};
pub use tick::{
    Detached, Heartbeat, Heartbeats, TickCommand, TickControl, TickHandle, TickSource,
    TICK_INTERVAL_MS,
};
pub use view::{progress, SessionStatus, TimerView};
