//! packsize add - Add package sizes to the catalog

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::catalog::{PackageEntry, validate_size};
use crate::cli::output::{self, HumanLayout};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Package sizes to add
    #[arg(
        required_unless_present = "defaults",
        conflicts_with = "defaults",
        allow_negative_numbers = true,
        num_args = 1..
    )]
    pub sizes: Vec<i64>,

    /// Add the configured default sizes
    #[arg(long)]
    pub defaults: bool,
}

#[derive(Debug, Serialize)]
struct AddOutput {
    message: &'static str,
    created: Vec<PackageEntry>,
}

pub fn run(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let sizes = if args.defaults {
        ctx.config.catalog.default_sizes.clone()
    } else {
        args.sizes
            .iter()
            .map(|&size| validate_size(size))
            .collect::<Result<Vec<u32>>>()?
    };

    let created = ctx.catalog.create_many(&sizes)?;
    let payload = AddOutput {
        message: "Packages added",
        created,
    };

    output::emit_formatted(
        &payload,
        ctx.output_format,
        |p| {
            let mut layout = HumanLayout::new();
            layout.title(&format!("{} {}", "✓".green(), p.message));
            for entry in &p.created {
                layout.bullet(&format!("{} {}", entry.size.to_string().bold(), entry.id.to_string().dimmed()));
            }
            layout.build()
        },
        |p| {
            p.created
                .iter()
                .map(|entry| format!("{}\t{}", entry.id, entry.size))
                .collect::<Vec<_>>()
                .join("\n")
        },
        |p| {
            output::tsv(&["id", "size"], &p.created, |entry| {
                vec![entry.id.to_string(), entry.size.to_string()]
            })
        },
    )
}
