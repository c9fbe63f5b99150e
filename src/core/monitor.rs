//! Search monitors consulted by the explorer between recursive steps.
//!
//! A monitor can observe the search and ask it to stop. The explorer calls
//! [`SearchMonitor::on_step`] once per visited remainder and then checks
//! [`SearchMonitor::search_command`]; a `Terminate` aborts the search with
//! [`crate::error::PackError::SearchInterrupted`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use super::candidate::Candidate;
use super::explorer::SearchStats;

/// Command returned by a monitor to control the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    Continue,
    Terminate(String),
}

/// Observer hooks for one exploration.
pub trait SearchMonitor: Send {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Called once before the first step.
    fn on_enter_search(&mut self, _sizes: &[u32], _order: u64) {}

    /// Called for every visited remainder.
    fn on_step(&mut self) {}

    /// Called when a remainder is expanded, with the number of remainders now
    /// held (memoized plus open frames).
    fn on_expand(&mut self, _open_states: usize) {}

    /// Called when a terminal candidate is recorded.
    fn on_terminal(&mut self, _candidate: &Candidate) {}

    /// Called once when the search finishes or is terminated.
    fn on_exit_search(&mut self, _stats: &SearchStats) {}

    /// Whether the search may continue.
    fn search_command(&self) -> SearchCommand;
}

impl std::fmt::Debug for dyn SearchMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SearchMonitor({})", self.name())
    }
}

/// Never stops the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMonitor;

impl SearchMonitor for NoOpMonitor {
    fn name(&self) -> &str {
        "NoOpMonitor"
    }

    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}

/// Stops the search once a shared flag is raised, e.g. from a Ctrl-C handler.
#[derive(Debug, Clone)]
pub struct InterruptMonitor {
    stop_flag: Arc<AtomicBool>,
}

impl InterruptMonitor {
    #[must_use]
    pub fn new(stop_flag: Arc<AtomicBool>) -> Self {
        Self { stop_flag }
    }
}

impl SearchMonitor for InterruptMonitor {
    fn name(&self) -> &str {
        "InterruptMonitor"
    }

    fn search_command(&self) -> SearchCommand {
        if self.stop_flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("interrupt signal received".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

/// Enforces a wall-clock budget.
///
/// The clock is only read when `steps & clock_check_mask == 0`, so the
/// default mask checks roughly every 16k steps.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    clock_check_mask: u64,
    steps: u64,
    start_time: Instant,
    expired: bool,
}

impl TimeLimitMonitor {
    pub const DEFAULT_CLOCK_CHECK_MASK: u64 = 0x3FFF;

    #[must_use]
    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            time_limit,
            clock_check_mask,
            steps: 0,
            start_time: Instant::now(),
            expired: false,
        }
    }
}

impl SearchMonitor for TimeLimitMonitor {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _sizes: &[u32], _order: u64) {
        self.start_time = Instant::now();
        self.steps = 0;
        self.expired = false;
    }

    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
        if !self.expired && (self.steps & self.clock_check_mask) == 0 {
            self.expired = self.start_time.elapsed() >= self.time_limit;
        }
    }

    fn search_command(&self) -> SearchCommand {
        if self.expired {
            SearchCommand::Terminate(format!(
                "time limit of {}ms reached",
                self.time_limit.as_millis()
            ))
        } else {
            SearchCommand::Continue
        }
    }
}

/// Bounds the memory a search may hold.
///
/// Every expanded remainder stays in the memo until the search ends, so the
/// state count only grows. Large orders over small sizes hit this long before
/// they would exhaust memory.
#[derive(Debug, Clone)]
pub struct StateLimitMonitor {
    max_states: usize,
    exceeded: bool,
}

impl StateLimitMonitor {
    pub const DEFAULT_MAX_STATES: u64 = 2_000_000;

    #[must_use]
    pub const fn new(max_states: usize) -> Self {
        Self {
            max_states,
            exceeded: false,
        }
    }
}

impl SearchMonitor for StateLimitMonitor {
    fn name(&self) -> &str {
        "StateLimitMonitor"
    }

    fn on_enter_search(&mut self, _sizes: &[u32], _order: u64) {
        self.exceeded = false;
    }

    fn on_expand(&mut self, open_states: usize) {
        if open_states > self.max_states {
            self.exceeded = true;
        }
    }

    fn search_command(&self) -> SearchCommand {
        if self.exceeded {
            SearchCommand::Terminate(format!(
                "state limit of {} remainders reached",
                self.max_states
            ))
        } else {
            SearchCommand::Continue
        }
    }
}

/// Fans every hook out to its children; the first child asking to stop wins.
#[derive(Debug, Default)]
pub struct CompositeMonitor {
    monitors: Vec<Box<dyn SearchMonitor>>,
}

impl CompositeMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, monitor: impl SearchMonitor + 'static) {
        self.monitors.push(Box::new(monitor));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.monitors.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl SearchMonitor for CompositeMonitor {
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    fn on_enter_search(&mut self, sizes: &[u32], order: u64) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(sizes, order);
        }
    }

    fn on_step(&mut self) {
        for monitor in &mut self.monitors {
            monitor.on_step();
        }
    }

    fn on_expand(&mut self, open_states: usize) {
        for monitor in &mut self.monitors {
            monitor.on_expand(open_states);
        }
    }

    fn on_terminal(&mut self, candidate: &Candidate) {
        for monitor in &mut self.monitors {
            monitor.on_terminal(candidate);
        }
    }

    fn on_exit_search(&mut self, stats: &SearchStats) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(stats);
        }
    }

    fn search_command(&self) -> SearchCommand {
        self.monitors
            .iter()
            .map(|monitor| monitor.search_command())
            .find(|command| matches!(command, SearchCommand::Terminate(_)))
            .unwrap_or(SearchCommand::Continue)
    }
}
