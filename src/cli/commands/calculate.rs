//! packsize calculate - Best package combination for an order

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tracing::{info, warn};

use crate::app::AppContext;
use crate::catalog::{validate_batch, validate_size};
use crate::cli::output::{self, HumanLayout};
use crate::core::{Optimization, PackOptimizer, PackReport, SearchStats, validate_order};
use crate::error::{PackError, Result};

#[derive(Args, Debug)]
pub struct CalculateArgs {
    /// Number of items to ship
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,

    /// Use these sizes instead of the catalog (comma separated)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub sizes: Option<Vec<i64>>,
}

#[derive(Debug, Serialize)]
struct CalculateOutput {
    #[serde(flatten)]
    report: PackReport,
    search: SearchStats,
}

pub fn run(ctx: &AppContext, args: &CalculateArgs) -> Result<()> {
    let order = validate_order(args.amount)?;
    let sizes = match &args.sizes {
        Some(raw) => explicit_sizes(raw)?,
        None => ctx.catalog.sizes_descending()?,
    };

    let stop = Arc::new(AtomicBool::new(false));
    let optimizer = ctx.optimizer().with_interrupt(Arc::clone(&stop));
    let Optimization { report, stats } = search_until_interrupted(optimizer, sizes, order, stop)?;
    info!(order, waste = report.waste, count = report.count, "order calculated");

    let payload = CalculateOutput {
        report,
        search: stats,
    };
    output::emit_formatted(&payload, ctx.output_format, render_human, render_plain, |p| {
        output::tsv(&["size", "quantity"], &p.report.packages, |line| {
            vec![line.size.to_string(), line.quantity.to_string()]
        })
    })
}

/// Sizes given on the command line, validated like catalog input and sorted
/// largest first.
fn explicit_sizes(raw: &[i64]) -> Result<Vec<u32>> {
    let mut sizes = raw
        .iter()
        .map(|&size| validate_size(size))
        .collect::<Result<Vec<u32>>>()?;
    validate_batch(&sizes)?;
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    Ok(sizes)
}

/// Run the search on a blocking thread while listening for Ctrl-C. The signal
/// raises `stop`; the search then returns `SearchInterrupted` on its next step.
fn search_until_interrupted(
    optimizer: PackOptimizer,
    sizes: Vec<u32>,
    order: u64,
    stop: Arc<AtomicBool>,
) -> Result<Optimization> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(watch_search(optimizer, sizes, order, stop))
}

async fn watch_search(
    optimizer: PackOptimizer,
    sizes: Vec<u32>,
    order: u64,
    stop: Arc<AtomicBool>,
) -> Result<Optimization> {
    let mut search = tokio::task::spawn_blocking(move || optimizer.optimize(&sizes, order));

    let joined = tokio::select! {
        joined = &mut search => joined,
        signal = tokio::signal::ctrl_c() => {
            if signal.is_ok() {
                warn!(order, "interrupt received, stopping search");
                stop.store(true, Ordering::Relaxed);
            }
            search.await
        }
    };
    joined.map_err(|err| PackError::Internal(format!("search task failed: {err}")))?
}

fn render_human(payload: &CalculateOutput) -> String {
    let report = &payload.report;
    let mut layout = HumanLayout::new();
    layout
        .title(&format!("Order of {}", report.order))
        .kv("shipped", &report.total.to_string())
        .kv("waste", &report.waste.to_string())
        .kv("packages", &report.count.to_string())
        .blank()
        .section("Packages");
    for line in &report.packages {
        layout.bullet(&format!(
            "{} x {}",
            line.size.to_string().bold(),
            line.quantity
        ));
    }
    layout.blank().push_line(
        format!(
            "{} candidates explored in {} ms",
            report.explored,
            payload.search.elapsed.as_millis()
        )
        .dimmed()
        .to_string(),
    );
    layout.build()
}

fn render_plain(payload: &CalculateOutput) -> String {
    payload
        .report
        .packages
        .iter()
        .map(|line| format!("{} x {}", line.size, line.quantity))
        .collect::<Vec<_>>()
        .join("\n")
}
