//! Optimizer facade: catalog snapshot → explorer → selector → report.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use tracing::{debug, warn};

use super::explorer::{SearchStats, explore_with_monitor};
use super::monitor::{CompositeMonitor, InterruptMonitor, StateLimitMonitor, TimeLimitMonitor};
use super::report::PackReport;
use super::selector::select;
use crate::catalog::CatalogProvider;
use crate::error::{PackError, Result};

/// Runs one optimization per call. Holds no state between calls beyond its
/// settings, so one optimizer can serve any number of orders.
#[derive(Debug, Clone)]
pub struct PackOptimizer {
    time_limit: Option<Duration>,
    clock_check_mask: u64,
    max_states: Option<usize>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl Default for PackOptimizer {
    fn default() -> Self {
        Self {
            time_limit: None,
            clock_check_mask: TimeLimitMonitor::DEFAULT_CLOCK_CHECK_MASK,
            max_states: usize::try_from(StateLimitMonitor::DEFAULT_MAX_STATES).ok(),
            interrupt: None,
        }
    }
}

/// A report together with the counters of the search that produced it.
#[derive(Debug, Clone)]
pub struct Optimization {
    pub report: PackReport,
    pub stats: SearchStats,
}

impl PackOptimizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort searches that run longer than `limit`. `Duration::ZERO` disables
    /// the limit.
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = (!limit.is_zero()).then_some(limit);
        self
    }

    #[must_use]
    pub const fn with_clock_check_mask(mut self, mask: u64) -> Self {
        self.clock_check_mask = mask;
        self
    }

    /// Abort searches that hold more than `max_states` remainders. Zero
    /// disables the limit.
    #[must_use]
    pub fn with_state_limit(mut self, max_states: u64) -> Self {
        self.max_states = (max_states > 0)
            .then(|| usize::try_from(max_states).unwrap_or(usize::MAX));
        self
    }

    /// Abort searches once `flag` is raised.
    #[must_use]
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }

    fn monitor(&self) -> CompositeMonitor {
        let mut monitor = CompositeMonitor::new();
        if let Some(limit) = self.time_limit {
            monitor.add(TimeLimitMonitor::with_clock_check_mask(limit, self.clock_check_mask));
        }
        if let Some(max_states) = self.max_states {
            monitor.add(StateLimitMonitor::new(max_states));
        }
        if let Some(flag) = &self.interrupt {
            monitor.add(InterruptMonitor::new(Arc::clone(flag)));
        }
        monitor
    }

    /// Best combination of `sizes` for `order`.
    ///
    /// `sizes` are tried in the order given; callers normally pass a
    /// descending snapshot.
    pub fn optimize(&self, sizes: &[u32], order: u64) -> Result<Optimization> {
        let mut monitor = self.monitor();
        let exploration = match explore_with_monitor(sizes, order, &mut monitor) {
            Ok(exploration) => exploration,
            Err(err @ PackError::SearchInterrupted(_)) => {
                warn!(order, error = %err, "search aborted");
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let stats = exploration.stats;
        debug!(
            ?sizes,
            order,
            terminals = stats.terminals,
            memo_entries = stats.memo_entries,
            memo_hits = stats.memo_hits,
            steps = stats.steps,
            elapsed_ms = stats.elapsed.as_millis(),
            "search finished"
        );

        let winner = select(&exploration.terminals, order)?;
        let report = PackReport::assemble(winner, order, exploration.terminals.len());
        Ok(Optimization { report, stats })
    }

    /// Validate `amount`, snapshot `catalog` and optimize.
    pub fn calculate(&self, catalog: &dyn CatalogProvider, amount: i64) -> Result<Optimization> {
        let order = validate_order(amount)?;
        let sizes = catalog.sizes_descending()?;
        self.optimize(&sizes, order)
    }
}

/// Check a caller-supplied order amount.
pub fn validate_order(amount: i64) -> Result<u64> {
    u64::try_from(amount)
        .ok()
        .filter(|&order| order > 0)
        .ok_or_else(|| PackError::InvalidOrder(amount.to_string()))
}
