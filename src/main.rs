use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod booking;
mod cli;
mod config;
mod tui;
mod version;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Set up panic hook for graceful error recovery
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("{}", panic_info);
        std::process::exit(1);
    }));

    // Load environment variables from .env file
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let interactive = cli.is_interactive();

    let config = match cli.load_config().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // The interface owns the terminal, so interactive runs log to a file
    let log_path = interactive.then(|| config.log_path());
    let log_guard = match init_logging(cli.debug, log_path.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = dotenv {
        // Don't error if .env file doesn't exist, just log it
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    // Execute CLI command
    if let Err(e) = cli.execute(config).await {
        error!("Application error: {:#}", e);
        if interactive {
            eprintln!("Error: {:#}", e);
        }
        // exit skips destructors, so flush the log file first
        drop(log_guard);
        std::process::exit(1);
    }
}

/// Set up tracing. With a log file, returns the guard that flushes it on drop.
fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if debug { "barbertime=debug" } else { "barbertime=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = match log_file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .try_init()
                .map(|_| Some(guard))
        }
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map(|_| None),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(guard)
}

/// Appender writing to exactly `path`, never rotated
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file {} has no file name", path.display()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}
