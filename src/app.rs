//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::run::RunError;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    use crate::run::RunError;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - unreadable config, unknown filter, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Write error (exit code 2) - config or Corefile could not be written.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn write_error() -> ExitCode {
        ExitCode::from(2)
    }

    /// Picks the exit code for a failed run.
    pub fn for_error(error: &RunError) -> ExitCode {
        if error.is_write_failure() {
            write_error()
        } else {
            CONFIG_ERROR
        }
    }
}

/// Prints helpful hints for common errors.
pub fn print_error_hint(error: &RunError) {
    match error {
        RunError::Load(_) => {
            eprintln!("\nFix or remove the configuration file; it is never replaced silently.");
        }
        RunError::AlreadyInitialized(_) => {
            eprintln!("\nRun 'dnsguard sync' to regenerate derived files from it.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to stderr so `render` and `status` output stays clean.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
