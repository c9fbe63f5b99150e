pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;

pub use catalog::{CatalogProvider, MemoryCatalog, PackageEntry};
pub use crate::core::{PackOptimizer, PackReport};
pub use error::{PackError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
