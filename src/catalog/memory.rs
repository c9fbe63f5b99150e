//! In-process catalog guarded by a single reader/writer lock.

use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{CatalogProvider, PackageEntry, validate_batch};
use crate::error::{PackError, Result};

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: RwLock<Vec<PackageEntry>>,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-filled with `sizes`.
    pub fn with_sizes(sizes: &[u32]) -> Result<Self> {
        let catalog = Self::new();
        catalog.create_many(sizes)?;
        Ok(catalog)
    }
}

fn ensure_absent(entries: &[PackageEntry], size: u32) -> Result<()> {
    if entries.iter().any(|entry| entry.size == size) {
        return Err(PackError::DuplicateSize(size));
    }
    Ok(())
}

impl CatalogProvider for MemoryCatalog {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn create(&self, size: u32) -> Result<PackageEntry> {
        validate_batch(&[size])?;
        let mut entries = self.entries.write();
        ensure_absent(&entries, size)?;
        let entry = PackageEntry::new(size);
        entries.push(entry.clone());
        info!(id = %entry.id, size, "package created");
        Ok(entry)
    }

    fn create_many(&self, sizes: &[u32]) -> Result<Vec<PackageEntry>> {
        validate_batch(sizes)?;
        let mut entries = self.entries.write();
        for &size in sizes {
            ensure_absent(&entries, size)?;
        }
        let created: Vec<PackageEntry> = sizes.iter().map(|&size| PackageEntry::new(size)).collect();
        entries.extend(created.iter().cloned());
        info!(count = created.len(), "packages created");
        Ok(created)
    }

    fn get(&self, id: Uuid) -> Result<PackageEntry> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .ok_or_else(|| PackError::PackageNotFound(id.to_string()))
    }

    fn update(&self, id: Uuid, size: u32) -> Result<PackageEntry> {
        validate_batch(&[size])?;
        let mut entries = self.entries.write();
        if entries.iter().any(|entry| entry.size == size && entry.id != id) {
            return Err(PackError::DuplicateSize(size));
        }
        let entry = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or_else(|| PackError::PackageNotFound(id.to_string()))?;
        entry.size = size;
        info!(%id, size, "package updated");
        Ok(entry.clone())
    }

    fn delete(&self, id: Uuid) -> Result<PackageEntry> {
        let mut entries = self.entries.write();
        let position = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| PackError::PackageNotFound(id.to_string()))?;
        let removed = entries.remove(position);
        info!(%id, size = removed.size, "package removed");
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<PackageEntry>> {
        Ok(self.entries.read().clone())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }
}
