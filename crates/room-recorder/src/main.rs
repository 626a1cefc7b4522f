//! Room-Recorder: per-room recording and RTMP relay control plane.

mod app;
mod config;
mod error;
mod ingest;
mod logging;

pub(crate) use {
    app::App,
    error::{AppError, Result as AppResult},
};

use crate::{config::Config, logging::init_logging};

use std::path::PathBuf;

use clap::Parser;
use tracing::error;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "room-recorder", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application entry point.
fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Dropping the guard flushes the file logger, so it lives until exit.
    let log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {}", e);
        std::process::exit(1);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let app = App { config };
    if let Err(e) = rt.block_on(app.run()) {
        error!(error = %e, "Recorder stopped with an error");
        drop(rt);
        drop(log_guard);
        std::process::exit(1);
    }
}
