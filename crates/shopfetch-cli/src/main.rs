use shopfetch_core::logging;

mod cli;

use crate::cli::{CliCommand, Outcome};

fn main() {
    // Initialize logging as early as possible.
    if let Err(file_err) = logging::init_logging() {
        if let Err(err) = logging::init_logging_stderr() {
            eprintln!("shopfetch: logging disabled: {:#} ({:#})", err, file_err);
        }
    }

    // Parse CLI and dispatch.
    match CliCommand::run_from_args() {
        Ok(Outcome::Done) => {}
        Ok(Outcome::Unverified) => std::process::exit(2),
        Err(err) => {
            eprintln!("shopfetch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
