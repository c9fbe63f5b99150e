//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// packsize - ship orders in the fewest, least wasteful packages
#[derive(Parser, Debug)]
#[command(name = "packsize")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Enable machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/packsize/config.toml and .packsize/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format requested on the command line, if any.
    ///
    /// `--output-format` wins over `--machine`.
    #[must_use]
    pub fn explicit_output_format(&self) -> Option<OutputFormat> {
        self.output_format
            .or_else(|| self.machine.then_some(OutputFormat::Json))
    }

    /// Whether errors should be printed as JSON before the config is known.
    #[must_use]
    pub fn wants_machine_errors(&self) -> bool {
        self.explicit_output_format()
            .is_some_and(|format| format.is_machine_readable())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the best package combination for an order
    Calculate(commands::calculate::CalculateArgs),

    /// Add package sizes to the catalog
    Add(commands::add::AddArgs),

    /// List catalog entries, largest size first
    List(commands::list::ListArgs),

    /// Show one catalog entry
    Show(commands::show::ShowArgs),

    /// Change the size of a catalog entry
    Update(commands::update::UpdateArgs),

    /// Remove a catalog entry
    Remove(commands::remove::RemoveArgs),

    /// Report liveness and catalog size
    Health(commands::health::HealthArgs),

    /// Show or edit configuration
    Config(commands::config::ConfigArgs),
}
