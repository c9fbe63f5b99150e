//! Result assembly: the winning combination as a report for callers.

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// One line of a packing report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackLine {
    pub size: u32,
    pub quantity: u32,
}

/// The packages to ship for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackReport {
    pub order: u64,
    /// Largest size first; zero quantities never appear.
    pub packages: Vec<PackLine>,
    pub total: u64,
    pub waste: u64,
    pub count: u64,
    /// Terminal candidates the explorer recorded.
    pub explored: usize,
}

impl PackReport {
    /// Build the report for `winner`.
    ///
    /// `winner` must be a terminal candidate, i.e. cover `order`.
    #[must_use]
    pub fn assemble(winner: &Candidate, order: u64, explored: usize) -> Self {
        let packages = winner
            .iter_descending()
            .filter(|&(_, quantity)| quantity > 0)
            .map(|(size, quantity)| PackLine { size, quantity })
            .collect();
        let total = winner.total();

        Self {
            order,
            packages,
            total,
            waste: total.saturating_sub(order),
            count: winner.count(),
            explored,
        }
    }

    #[must_use]
    pub fn quantity(&self, size: u32) -> u32 {
        self.packages
            .iter()
            .find(|line| line.size == size)
            .map_or(0, |line| line.quantity)
    }
}
