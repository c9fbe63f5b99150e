//! Per-invocation application context shared by every command.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::catalog::{CatalogProvider, MemoryCatalog};
use crate::cli::{Cli, OutputFormat};
use crate::config::{CatalogBackend, Config};
use crate::core::PackOptimizer;
use crate::error::Result;
use crate::storage::Database;

pub struct AppContext {
    /// Directory holding the project config and the default database.
    pub root: PathBuf,
    pub config: Config,
    /// File that `packsize config --set` writes to.
    pub config_path: PathBuf,
    pub catalog: Arc<dyn CatalogProvider>,
    pub output_format: OutputFormat,
    pub machine_mode: bool,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("root", &self.root)
            .field("backend", &self.catalog.backend())
            .field("output_format", &self.output_format)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = resolve_root();
        let config = Config::load(cli.config.as_deref(), &root)?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| root.join("config.toml"));

        let output_format = match cli.explicit_output_format() {
            Some(format) => format,
            None => config.output.format.parse()?,
        };

        let catalog = open_catalog(&config, &root)?;
        debug!(root = %root.display(), backend = catalog.backend(), "context ready");

        Ok(Self {
            root,
            config,
            config_path,
            catalog,
            output_format,
            machine_mode: output_format.is_machine_readable(),
        })
    }

    /// Optimizer configured from `[search]`.
    #[must_use]
    pub fn optimizer(&self) -> PackOptimizer {
        PackOptimizer::new()
            .with_time_limit(Duration::from_millis(self.config.search.time_limit_ms))
            .with_clock_check_mask(self.config.search.clock_check_mask)
            .with_state_limit(self.config.search.max_states)
    }
}

/// `PACKSIZE_ROOT`, or `.packsize` under the working directory.
#[must_use]
pub fn resolve_root() -> PathBuf {
    std::env::var_os("PACKSIZE_ROOT")
        .map_or_else(|| PathBuf::from(".packsize"), PathBuf::from)
}

/// Open the configured backend. A memory catalog lives for one invocation,
/// so it starts out holding `default_sizes`.
pub fn open_catalog(config: &Config, root: &Path) -> Result<Arc<dyn CatalogProvider>> {
    Ok(match config.catalog.backend {
        CatalogBackend::Sqlite => {
            Arc::new(Database::open(config.catalog.resolved_db_path(root))?)
        }
        CatalogBackend::Memory => Arc::new(MemoryCatalog::with_sizes(&config.catalog.default_sizes)?),
    })
}
