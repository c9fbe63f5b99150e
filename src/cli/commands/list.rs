//! packsize list - List catalog entries

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::catalog::{PackageEntry, sorted_descending};
use crate::cli::OutputFormat;
use crate::cli::output;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Maximum number of entries to show
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let mut entries = sorted_descending(ctx.catalog.list()?);
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    match ctx.output_format {
        OutputFormat::Json => output::emit_json(&output::machine_ok(&entries)),
        OutputFormat::Jsonl => {
            for entry in &entries {
                println!("{}", serde_json::to_string(entry)?);
            }
            Ok(())
        }
        OutputFormat::Tsv => {
            println!(
                "{}",
                output::tsv(&["id", "size", "created_at"], &entries, |entry| {
                    vec![
                        entry.id.to_string(),
                        entry.size.to_string(),
                        entry.created_at.to_rfc3339(),
                    ]
                })
            );
            Ok(())
        }
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}\t{}", entry.size, entry.id);
            }
            Ok(())
        }
        OutputFormat::Human => {
            list_human(&entries);
            Ok(())
        }
    }
}

fn list_human(entries: &[PackageEntry]) {
    if entries.is_empty() {
        println!("{}", "No packages in the catalog".dimmed());
        println!();
        println!("Add sizes with: packsize add --defaults");
        return;
    }

    println!("{:>10}  {:36}  {:20}", "SIZE".bold(), "ID".bold(), "CREATED".bold());
    println!("{}", "─".repeat(70).dimmed());
    for entry in entries {
        println!(
            "{:>10}  {:36}  {:20}",
            entry.size.to_string().cyan(),
            entry.id.to_string(),
            entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()
        );
    }
    println!();
    println!("{} package sizes", entries.len());
}
