//! packsize health - Liveness and catalog size

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{self, HumanLayout};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct HealthArgs {}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub is_alive: bool,
    pub message: &'static str,
    pub backend: &'static str,
    pub packages: usize,
}

pub fn run(ctx: &AppContext, _args: &HealthArgs) -> Result<()> {
    let report = HealthReport {
        is_alive: true,
        message: "alive",
        backend: ctx.catalog.backend(),
        packages: ctx.catalog.len()?,
    };

    output::emit_formatted(
        &report,
        ctx.output_format,
        |r| {
            let mut layout = HumanLayout::new();
            layout
                .title(&format!("{} packsize {}", "●".green(), r.message))
                .kv("version", crate::VERSION)
                .kv("backend", r.backend)
                .kv("packages", &r.packages.to_string());
            layout.build()
        },
        |r| r.message.to_string(),
        |r| {
            output::tsv(&["is_alive", "backend", "packages"], &[r], |r| {
                vec![r.is_alive.to_string(), r.backend.to_string(), r.packages.to_string()]
            })
        },
    )
}
