//! Catalog fixtures shared by the integration tests.

use std::sync::Arc;

use packsize::CatalogProvider;
use packsize::catalog::{DEFAULT_SIZES, MemoryCatalog};
use packsize::storage::Database;
use tempfile::TempDir;

/// One catalog per backend. The temp dir keeps the SQLite file alive.
pub struct Backends {
    pub catalogs: Vec<Arc<dyn CatalogProvider>>,
    _temp: TempDir,
}

impl Backends {
    pub fn empty() -> Self {
        let temp = TempDir::new().unwrap();
        let db = Database::open(temp.path().join("catalog.db")).unwrap();
        Self {
            catalogs: vec![Arc::new(MemoryCatalog::new()), Arc::new(db)],
            _temp: temp,
        }
    }

    pub fn with_defaults() -> Self {
        let backends = Self::empty();
        for catalog in &backends.catalogs {
            catalog.create_many(&DEFAULT_SIZES).unwrap();
        }
        backends
    }
}
