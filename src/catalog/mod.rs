//! Package catalog: the set of container sizes on offer.
//!
//! Providers own entry identity and enforce that no two entries share a size.
//! The optimizer only ever sees [`CatalogProvider::sizes_descending`].

pub mod memory;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PackError, Result};

pub use memory::MemoryCatalog;

/// Default sizes seeded by `packsize add --defaults`.
pub const DEFAULT_SIZES: [u32; 5] = [250, 500, 1000, 2000, 5000];

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub id: Uuid,
    pub size: u32,
    pub created_at: DateTime<Utc>,
}

impl PackageEntry {
    /// New entry with a fresh v4 id.
    #[must_use]
    pub fn new(size: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            size,
            created_at: Utc::now(),
        }
    }
}

/// Storage backend for the package catalog.
pub trait CatalogProvider: Send + Sync {
    /// Backend name used in logs and `packsize health`.
    fn backend(&self) -> &'static str;

    /// Insert one size. Fails with [`PackError::DuplicateSize`] when it exists.
    fn create(&self, size: u32) -> Result<PackageEntry>;

    /// Insert several sizes, all or nothing.
    fn create_many(&self, sizes: &[u32]) -> Result<Vec<PackageEntry>>;

    fn get(&self, id: Uuid) -> Result<PackageEntry>;

    /// Change the size of an entry. Fails with [`PackError::DuplicateSize`]
    /// when another entry already holds `size`.
    fn update(&self, id: Uuid, size: u32) -> Result<PackageEntry>;

    fn delete(&self, id: Uuid) -> Result<PackageEntry>;

    /// All entries in insertion order.
    fn list(&self) -> Result<Vec<PackageEntry>>;

    /// Snapshot of the sizes on offer, largest first.
    fn sizes_descending(&self) -> Result<Vec<u32>> {
        let mut sizes: Vec<u32> = self.list()?.into_iter().map(|entry| entry.size).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        Ok(sizes)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}

/// Check a user-supplied size: positive and within `u32`.
pub fn validate_size(size: i64) -> Result<u32> {
    u32::try_from(size)
        .ok()
        .filter(|&size| size > 0)
        .ok_or(PackError::InvalidSize(size))
}

/// Check a batch before anything is written: every size positive and no
/// repeats inside the batch.
pub fn validate_batch(sizes: &[u32]) -> Result<()> {
    let mut seen = HashSet::with_capacity(sizes.len());
    for &size in sizes {
        if size == 0 {
            return Err(PackError::InvalidSize(0));
        }
        if !seen.insert(size) {
            return Err(PackError::DuplicateSize(size));
        }
    }
    Ok(())
}

/// Parse a package id as printed by `packsize list`.
pub fn parse_package_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|err| PackError::InvalidPackageId(format!("{raw}: {err}")))
}

/// Entries sorted by size, largest first.
#[must_use]
pub fn sorted_descending(mut entries: Vec<PackageEntry>) -> Vec<PackageEntry> {
    entries.sort_by(|a, b| b.size.cmp(&a.size));
    entries
}
