//! Notes - threaded study notes in the terminal
//!
//! Reads one command per line from stdin and prints the result to stdout.
//! Logs go to stderr; set `RUST_LOG=debug` to see every mutation.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use notes_core::NotesConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;
mod state;

use state::{AppState, Outcome};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Notes");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut app_state = match AppState::new(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = run(&mut app_state, stdin.lock(), stdout.lock()) {
        tracing::error!("Terminal I/O failed: {}", e);
        std::process::exit(1);
    }
}

/// Config file from the first argument, else the platform default
fn load_config() -> notes_core::Result<NotesConfig> {
    let path = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => NotesConfig::default_path()?,
    };
    NotesConfig::load(&path)
}

/// Input loop; stops at end of input or `quit`
fn run<R: BufRead, W: Write>(state: &mut AppState, input: R, mut output: W) -> io::Result<()> {
    writeln!(
        output,
        "Notes. Send as: {}. Type 'help' for commands.",
        render::sender_label(state.sender())
    )?;

    for line in input.lines() {
        let line = line?;
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "error: {}", e)?;
                continue;
            }
        };

        match state.handle(command) {
            Ok(Outcome::Print(text)) if text.is_empty() => {}
            Ok(Outcome::Print(text)) => writeln!(output, "{}", text.trim_end())?,
            Ok(Outcome::Quit) => break,
            Err(e) => {
                tracing::debug!(error = %e, "Command rejected");
                writeln!(output, "error: {}", e)?;
            }
        }
        output.flush()?;
    }

    Ok(())
}
