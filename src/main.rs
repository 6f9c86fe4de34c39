//! cellshell - Main Entry Point
//!
//! Loads the configuration, sets up file logging and hands the terminal to
//! the console prompter.

use std::fs::OpenOptions;
use std::path::Path;
use std::process;
use std::sync::Mutex;

use cellshell::cli::{ConsoleConfig, ConsolePrompter};
use cellshell::Result;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let config = match ConsoleConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            eprintln!("Check CELLSHELL_CONFIG or cellshell.json and try again.");
            process::exit(1);
        }
    };

    if let Some(path) = &config.log_file {
        if let Err(e) = init_logging(path) {
            eprintln!("ERROR: cannot open log file {}: {}", path.display(), e);
            process::exit(1);
        }
    }

    if let Err(e) = run_console(config).await {
        eprintln!("\nERROR: cellshell encountered an error: {}", e);
        eprintln!("Please check your terminal compatibility and try again.");
        process::exit(1);
    }
}

/// Send tracing output to `path`; the terminal belongs to the console
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(())
}

async fn run_console(config: ConsoleConfig) -> Result<()> {
    let welcome = config.welcome();
    let mut prompter = ConsolePrompter::new(config)?;

    if let Some(message) = welcome {
        if let Err(e) = prompter.inbox().send(message) {
            warn!(error = %e, "welcome message not delivered");
        }
    }

    prompter.run().await
}
