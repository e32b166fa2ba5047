//! Harvest Storefront CLI

use std::{io, process::ExitCode};

use harvest::logging;
use tracing::error;

use crate::cli::Cli;

mod cli;

fn main() -> ExitCode {
    let cli = match Cli::load() {
        Ok(cli) => cli,
        Err(error) => {
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = logging::init_subscriber(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("{error}");
        }

        return ExitCode::FAILURE;
    }

    let mut out = io::stdout().lock();

    match cli.run(&mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");

            #[expect(
                clippy::print_stderr,
                reason = "user-facing error message, independent of the log level"
            )]
            {
                eprintln!("error: {message}");
            }

            ExitCode::FAILURE
        }
    }
}
