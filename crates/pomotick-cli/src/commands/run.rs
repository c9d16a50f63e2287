//! Interactive host: reads commands from stdin and redraws a status line on
//! every view change.

use std::io::Write;

use pomotick_core::app;
use pomotick_core::{Config, TimerHandle, TimerView};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: start | pause | reset | duration <minutes> | status | quit";

fn draw(view: &TimerView) {
    let mut out = std::io::stdout().lock();
    let _ = write!(
        out,
        "\r\x1b[2K{} [{:>3.0}%] {}",
        view.clock(),
        view.progress * 100.0,
        view.title
    );
    let _ = out.flush();
}

enum Input {
    Handled,
    Quit,
}

fn handle_line(line: &str, handle: &TimerHandle) -> Input {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some("start"), None) => handle.start(),
        (Some("pause"), None) => handle.pause(),
        (Some("reset"), None) => handle.reset(),
        (Some("duration"), Some(arg)) => match arg.parse::<i64>() {
            Ok(minutes) => handle.set_duration(minutes),
            Err(_) => println!("\nnot a number: {arg}"),
        },
        (Some("status"), None) => match serde_json::to_string_pretty(&handle.view()) {
            Ok(json) => println!("\n{json}"),
            Err(e) => tracing::warn!(error = %e, "failed to encode view"),
        },
        (Some("quit" | "exit" | "q"), None) => return Input::Quit,
        (None, _) => {}
        _ => println!("\n{HELP}"),
    }
    Input::Handled
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async move {
        let (mut handle, driver) = app::launch(&config, app::open_store());
        println!("{HELP}");
        draw(&handle.view());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => {
                        if let Input::Quit = handle_line(line.trim(), &handle) {
                            break;
                        }
                        draw(&handle.view());
                    }
                    None => break,
                },
                view = handle.changed() => match view {
                    Some(view) => draw(&view),
                    None => break,
                },
            }
        }
        println!();

        drop(handle);
        let engine = driver.await?;
        tracing::debug!(remaining = engine.remaining_secs(), "driver stopped");
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
