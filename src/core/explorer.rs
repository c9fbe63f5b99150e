//! Combination explorer.
//!
//! Decomposes the order into package choices, depth first, trying the sizes in
//! the order they were supplied. A remainder that has been fully expanded once
//! is never expanded again: the memo is keyed by the remaining quantity alone,
//! so a later path arriving at the same remainder through a different prefix
//! is cut off without recording anything. Only combinations reachable through
//! first-visit paths are ever produced.
//!
//! The recursion runs on an explicit frame stack instead of the call stack so
//! that large orders over small sizes cannot overflow the thread stack. Each
//! frame is one pending call of the recursive formulation:
//!
//! ```text
//! reach(remaining, prefix):
//!     remaining <= 0            -> record prefix, return prefix
//!     remaining in memo         -> return memo[remaining]
//!     for s in sizes            -> last = reach(remaining - s, prefix + s)
//!     memo[remaining] = last; return last
//! ```

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::candidate::Candidate;
use super::monitor::{NoOpMonitor, SearchCommand, SearchMonitor};
use crate::error::{PackError, Result};

/// Counters collected during one exploration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Remainders visited, including terminal and memoized ones.
    pub steps: u64,
    /// Terminal candidates recorded.
    pub terminals: usize,
    /// Remainders fully expanded.
    pub memo_entries: usize,
    /// Visits cut short by the memo.
    pub memo_hits: u64,
    /// Deepest frame stack reached.
    pub max_depth: usize,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

/// Terminal candidates in the order they were recorded, plus counters.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub terminals: Vec<Candidate>,
    pub stats: SearchStats,
}

/// Explore without a monitor.
pub fn explore(sizes: &[u32], order: u64) -> Result<Exploration> {
    explore_with_monitor(sizes, order, &mut NoOpMonitor)
}

/// Explore, consulting `monitor` between steps.
///
/// Fails with [`PackError::EmptyCatalog`] when `sizes` is empty, with
/// [`PackError::InvalidSize`] when a size is zero, and with
/// [`PackError::InvalidOrder`] when `order` is zero or does not fit the signed
/// remainder arithmetic.
pub fn explore_with_monitor(
    sizes: &[u32],
    order: u64,
    monitor: &mut dyn SearchMonitor,
) -> Result<Exploration> {
    if sizes.is_empty() {
        return Err(PackError::EmptyCatalog);
    }
    if sizes.contains(&0) {
        return Err(PackError::InvalidSize(0));
    }
    let remaining = i64::try_from(order)
        .ok()
        .filter(|&order| order > 0)
        .ok_or_else(|| PackError::InvalidOrder(order.to_string()))?;

    monitor.on_enter_search(sizes, order);
    let mut search = Search::new(sizes);
    let outcome = search.run(remaining, monitor);
    search.stats.elapsed = search.started.elapsed();
    monitor.on_exit_search(&search.stats);
    outcome?;

    Ok(Exploration {
        terminals: search.terminals,
        stats: search.stats,
    })
}

/// One pending `reach` call.
struct Frame {
    remaining: i64,
    prefix: Candidate,
    next_size: usize,
    last: Option<Candidate>,
}

/// Per-call search state. Nothing here outlives one exploration.
struct Search<'a> {
    sizes: &'a [u32],
    memo: HashMap<i64, Candidate>,
    terminals: Vec<Candidate>,
    frames: Vec<Frame>,
    stats: SearchStats,
    started: Instant,
}

/// Result of entering a `reach` call.
enum Visit {
    /// The call returned immediately with this value.
    Done(Candidate),
    /// A frame was pushed and must be expanded.
    Expand,
}

impl<'a> Search<'a> {
    fn new(sizes: &'a [u32]) -> Self {
        Self {
            sizes,
            memo: HashMap::new(),
            terminals: Vec::new(),
            frames: Vec::new(),
            stats: SearchStats::default(),
            started: Instant::now(),
        }
    }

    fn run(&mut self, order: i64, monitor: &mut dyn SearchMonitor) -> Result<Candidate> {
        if let Visit::Done(value) = self.visit(order, Candidate::new(), monitor)? {
            return Ok(value);
        }

        loop {
            let Some(frame) = self.frames.last_mut() else {
                return Err(PackError::Internal("search stack drained early".to_string()));
            };

            if let Some(&size) = self.sizes.get(frame.next_size) {
                frame.next_size += 1;
                let remaining = frame.remaining - i64::from(size);
                let prefix = frame.prefix.with_package(size);
                if let Visit::Done(value) = self.visit(remaining, prefix, monitor)? {
                    self.return_to_parent(value);
                }
                continue;
            }

            let Some(frame) = self.frames.pop() else {
                return Err(PackError::Internal("search stack drained early".to_string()));
            };
            let value = frame.last.ok_or(PackError::EmptyCatalog)?;
            self.memo.insert(frame.remaining, value.clone());
            self.stats.memo_entries = self.memo.len();

            if self.frames.is_empty() {
                return Ok(value);
            }
            self.return_to_parent(value);
        }
    }

    fn visit(
        &mut self,
        remaining: i64,
        prefix: Candidate,
        monitor: &mut dyn SearchMonitor,
    ) -> Result<Visit> {
        self.stats.steps += 1;
        monitor.on_step();
        if let SearchCommand::Terminate(reason) = monitor.search_command() {
            return Err(PackError::SearchInterrupted(reason));
        }

        if remaining <= 0 {
            monitor.on_terminal(&prefix);
            self.terminals.push(prefix.clone());
            self.stats.terminals = self.terminals.len();
            return Ok(Visit::Done(prefix));
        }

        if let Some(memoized) = self.memo.get(&remaining) {
            self.stats.memo_hits += 1;
            return Ok(Visit::Done(memoized.clone()));
        }

        self.frames.push(Frame {
            remaining,
            prefix,
            next_size: 0,
            last: None,
        });
        self.stats.max_depth = self.stats.max_depth.max(self.frames.len());
        monitor.on_expand(self.memo.len() + self.frames.len());
        Ok(Visit::Expand)
    }

    fn return_to_parent(&mut self, value: Candidate) {
        if let Some(parent) = self.frames.last_mut() {
            parent.last = Some(value);
        }
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}
