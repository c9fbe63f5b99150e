//! packsize - package-combination optimizer CLI
//!
//! Works out which container sizes to ship so an order is covered with the
//! least waste and, among equally wasteful options, the fewest containers.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use packsize::app::AppContext;
use packsize::cli::Cli;
use packsize::cli::output;
use packsize::{PackError, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&cli, &err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    packsize::cli::commands::run(&ctx, &cli.command)
}

fn report_error(cli: &Cli, err: &PackError) {
    if cli.wants_machine_errors() {
        // Error envelope on stdout, where JSON results go.
        let payload = serde_json::to_string_pretty(&output::machine_error(err))
            .unwrap_or_else(|_| format!("{{\"error\":true,\"message\":{:?}}}", err.to_string()));
        println!("{payload}");
    } else {
        let structured = err.to_structured();
        eprintln!("Error: {err}");
        eprintln!("  {}: {}", structured.code, structured.suggestion);
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,packsize=info",
        1 => "info,packsize=debug",
        2 => "debug,packsize=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.wants_machine_errors() {
        // stdout carries the JSON payload; events stay on stderr.
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
