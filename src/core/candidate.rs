//! Package combinations built up during the search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A combination of package sizes and how many of each are shipped.
///
/// Candidates are never mutated once handed out: [`Candidate::with_package`]
/// returns a fresh combination, so sibling search branches cannot observe each
/// other's additions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    packages: BTreeMap<u32, u32>,
}

impl Candidate {
    /// Create an empty combination.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a combination from `(size, quantity)` pairs. Zero quantities are dropped
    /// and repeated sizes accumulate.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, u32)>) -> Self {
        let mut packages = BTreeMap::new();
        for (size, quantity) in pairs {
            if quantity == 0 {
                continue;
            }
            *packages.entry(size).or_insert(0) += quantity;
        }
        Self { packages }
    }

    /// Copy of this combination with one more package of `size`.
    #[must_use]
    pub fn with_package(&self, size: u32) -> Self {
        let mut packages = self.packages.clone();
        *packages.entry(size).or_insert(0) += 1;
        Self { packages }
    }

    /// Number of packages of `size` in this combination.
    #[must_use]
    pub fn quantity(&self, size: u32) -> u32 {
        self.packages.get(&size).copied().unwrap_or(0)
    }

    /// Total capacity shipped: the sum of size times quantity.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.packages
            .iter()
            .map(|(&size, &quantity)| u64::from(size) * u64::from(quantity))
            .sum()
    }

    /// Capacity shipped beyond `order`. Negative while the combination is still short.
    #[must_use]
    pub fn waste(&self, order: u64) -> i128 {
        i128::from(self.total()) - i128::from(order)
    }

    /// Number of packages shipped.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.packages.values().map(|&quantity| u64::from(quantity)).sum()
    }

    /// `(size, quantity)` pairs, largest size first.
    pub fn iter_descending(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.packages.iter().rev().map(|(&size, &quantity)| (size, quantity))
    }
}
