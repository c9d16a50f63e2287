use std::path::PathBuf;

use pomotick_core::notify::ChimePlayer;
use pomotick_core::Config;

pub fn run(out: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    match out {
        Some(path) => {
            ChimePlayer::write_wav(&path)?;
            println!("{}", path.display());
        }
        None => {
            let config = Config::load_or_default();
            // Explicit request: play even if completion sounds are switched off.
            ChimePlayer::new(true, config.notifications.player).play()?;
        }
    }
    Ok(())
}
