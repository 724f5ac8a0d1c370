//! dnsguard: DNS filtering configuration store
//!
//! Entry point for the dnsguard application.

use dnsguard::config::Cli;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_error_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    let mut stdout = std::io::stdout().lock();
    match run::execute(&cli, &mut stdout) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            print_error_hint(&e);
            exit_code::for_error(&e)
        }
    }
}
