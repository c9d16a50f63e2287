//! One-shot session commands. Each restores the stored session, applies at
//! most one command and prints the resulting view.

use pomotick_core::app;
use pomotick_core::{Config, TimerEngine};

fn load_engine() -> TimerEngine {
    let config = Config::load_or_default();
    app::restore_detached(&config, app::open_store())
}

fn print_view(engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&engine.view())?);
    Ok(())
}

pub fn status() -> Result<(), Box<dyn std::error::Error>> {
    print_view(&load_engine())
}

pub fn reset() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = load_engine();
    engine.reset();
    print_view(&engine)
}

pub fn duration(minutes: i64) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = load_engine();
    if engine.set_duration(minutes).is_none() {
        eprintln!("timer is running; pause or reset before changing the duration");
    }
    print_view(&engine)
}
