// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commit_ai::{App, Cli, Error};

const VERBOSE_FILTER: &str = "commit_ai=debug";
const DEFAULT_FILTER: &str = "commit_ai=warn";

#[tokio::main]
async fn main() -> ExitCode {
    install_report_handler();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let outcome = match App::new(cli) {
        Ok(mut app) => app.run().await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        // Declining a prompt is not a failure
        Err(Error::Cancelled) => {
            eprintln!("Aborted.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            ExitCode::FAILURE
        }
    }
}

fn install_report_handler() {
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .context_lines(2)
                .build(),
        )
    }));
}

/// Logs go to stderr so `generate` keeps stdout for the message alone.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::env::var_os("NO_COLOR").is_none())
        .without_time()
        .init();
}
