use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomotick", version, about = "Pomotick focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer interactively
    Run,
    /// Print the current session as JSON
    Status,
    /// Reset the session to its full length
    Reset,
    /// Set the session length in minutes (1-120)
    Duration {
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Play the completion chime, or write it as a WAV file
    Chime {
        /// Write the chime to this file instead of playing it
        #[arg(long)]
        out: Option<std::path::PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("POMOTICK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Status => commands::timer::status(),
        Commands::Reset => commands::timer::reset(),
        Commands::Duration { minutes } => commands::timer::duration(minutes),
        Commands::Config { action } => commands::config::run(action),
        Commands::Chime { out } => commands::chime::run(out),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
