//! powermenu entry point.
//!
//! Wires the settings, the layout file, the display backend, the session
//! controller, and the shell together.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Cli::try_parse()           -- flags (errors are printed, exit 0)
//!  └─ load_settings()            -- defaults ← settings.toml ← flags
//!  └─ init_logging()             -- RUST_LOG, else the log_level setting
//!  └─ launch()
//!       ├─ locate + read + parse the layout (nothing is shown on failure)
//!       ├─ NativePlatform::open()
//!       ├─ DisplaySessionController::run()  -- windows up, input, teardown
//!       └─ handoff::execute()               -- /bin/sh -c <action>
//! ```

use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use powermenu::application::platform::PlatformError;
use powermenu::error::AppError;
use powermenu::infrastructure::cli::Cli;
use powermenu::infrastructure::shell::ShellRunner;
use powermenu::infrastructure::storage::settings::{load_settings, Settings};
use powermenu::launch::launch;

/// Log filter used when neither `RUST_LOG` nor a setting names one.
const DEFAULT_LOG_LEVEL: &str = "warn";

fn main() -> ExitCode {
    // Argument errors are reported but do not fail the process.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    let settings = load_settings(cli.settings.as_deref()).map(|mut settings| {
        cli.apply_to(&mut settings);
        settings
    });

    let level = cli
        .log_level
        .clone()
        .or_else(|| settings.as_ref().ok().map(|s| s.menu.log_level.clone()))
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    if let Err(e) = init_logging(&level) {
        eprintln!("powermenu: {e:#}; falling back to {DEFAULT_LOG_LEVEL:?}");
        let _ = init_logging(DEFAULT_LOG_LEVEL);
    }

    match settings.map_err(AppError::from).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initialises structured logging on stderr.
fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("invalid log level {level:?}"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

fn run(settings: Settings) -> Result<(), AppError> {
    launch(&settings, open_platform, &ShellRunner::default()).map(|_| ())
}

#[cfg(target_os = "linux")]
fn open_platform() -> Result<powermenu::infrastructure::display::NativePlatform, PlatformError> {
    powermenu::infrastructure::display::NativePlatform::open()
}

#[cfg(not(target_os = "linux"))]
fn open_platform() -> Result<powermenu::infrastructure::display::mock::MockPlatform, PlatformError> {
    Err(PlatformError::Unavailable(
        "no display backend for this operating system".to_string(),
    ))
}
