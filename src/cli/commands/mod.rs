//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::PackageEntry;
use crate::cli::Commands;
use crate::cli::output::{self, HumanLayout};
use crate::error::Result;

pub mod add;
pub mod calculate;
pub mod config;
pub mod health;
pub mod list;
pub mod remove;
pub mod show;
pub mod update;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Calculate(args) => calculate::run(ctx, args),
        Commands::Add(args) => add::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::Update(args) => update::run(ctx, args),
        Commands::Remove(args) => remove::run(ctx, args),
        Commands::Health(args) => health::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}

/// One catalog entry plus what just happened to it.
#[derive(Debug, Serialize)]
struct EntryOutput<'a> {
    action: &'a str,
    #[serde(flatten)]
    entry: &'a PackageEntry,
}

/// Print a single entry as `show`, `update` and `remove` report it.
fn emit_entry(ctx: &AppContext, action: &str, entry: &PackageEntry) -> Result<()> {
    let payload = EntryOutput { action, entry };
    output::emit_formatted(
        &payload,
        ctx.output_format,
        |p| {
            let mut layout = HumanLayout::new();
            layout
                .title(&format!("Package {}", p.action))
                .kv("id", &p.entry.id.to_string())
                .kv("size", &p.entry.size.to_string().bold().to_string())
                .kv("created", &p.entry.created_at.to_rfc3339());
            layout.build()
        },
        |p| format!("{}\t{}", p.entry.id, p.entry.size),
        |p| {
            output::tsv(&["action", "id", "size", "created_at"], &[p], |p| {
                vec![
                    p.action.to_string(),
                    p.entry.id.to_string(),
                    p.entry.size.to_string(),
                    p.entry.created_at.to_rfc3339(),
                ]
            })
        },
    )
}
