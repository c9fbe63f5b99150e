use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_SIZES;
use crate::error::{PackError, Result};

/// Names accepted by `[output] format` and `PACKSIZE_OUTPUT_FORMAT`.
pub const OUTPUT_FORMATS: [&str; 5] = ["human", "json", "jsonl", "plain", "tsv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load the effective configuration.
    ///
    /// Layers, later ones winning: defaults, then either the explicit file
    /// (`--config` or `PACKSIZE_CONFIG`) or the global and project files,
    /// then `PACKSIZE_*` environment variables.
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env_string("PACKSIZE_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?
                .ok_or_else(|| PackError::Config(format!("config file {} not found", path.display())))?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_overrides(env_string)?;
        config.validate()?;

        Ok(config)
    }

    /// Path of the per-user config file, if the platform has a config dir.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("packsize").join("config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| PackError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| PackError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.catalog {
            self.catalog.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    /// Apply `PACKSIZE_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("PACKSIZE_CATALOG_BACKEND") {
            self.catalog.backend = parse_backend(&value)?;
        }
        if let Some(value) = lookup("PACKSIZE_DB_PATH") {
            self.catalog.db_path = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("PACKSIZE_DEFAULT_SIZES") {
            self.catalog.default_sizes = parse_list("PACKSIZE_DEFAULT_SIZES", &value)?;
        }

        if let Some(value) = lookup("PACKSIZE_TIME_LIMIT_MS") {
            self.search.time_limit_ms = parse_number("PACKSIZE_TIME_LIMIT_MS", &value)?;
        }
        if let Some(value) = lookup("PACKSIZE_CLOCK_CHECK_MASK") {
            self.search.clock_check_mask = parse_mask("PACKSIZE_CLOCK_CHECK_MASK", &value)?;
        }
        if let Some(value) = lookup("PACKSIZE_MAX_STATES") {
            self.search.max_states = parse_number("PACKSIZE_MAX_STATES", &value)?;
        }

        if let Some(value) = lookup("PACKSIZE_OUTPUT_FORMAT") {
            self.output.format = value.trim().to_lowercase();
        }

        Ok(())
    }

    /// Reject values no command could work with.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.default_sizes.is_empty() {
            return Err(PackError::Config("catalog.default_sizes must not be empty".to_string()));
        }
        crate::catalog::validate_batch(&self.catalog.default_sizes)
            .map_err(|err| PackError::Config(format!("catalog.default_sizes: {err}")))?;
        if !OUTPUT_FORMATS.contains(&self.output.format.as_str()) {
            return Err(PackError::Config(format!(
                "output.format must be one of {}, got '{}'",
                OUTPUT_FORMATS.join(", "),
                self.output.format
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogBackend {
    #[default]
    Sqlite,
    Memory,
}

impl std::fmt::Display for CatalogBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub backend: CatalogBackend,
    /// Defaults to `<root>/packsize.db` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
    pub default_sizes: Vec<u32>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: CatalogBackend::Sqlite,
            db_path: None,
            default_sizes: DEFAULT_SIZES.to_vec(),
        }
    }
}

impl CatalogConfig {
    fn merge(&mut self, patch: CatalogPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.db_path {
            self.db_path = Some(value);
        }
        if let Some(value) = patch.default_sizes {
            self.default_sizes = value;
        }
    }

    /// Database location, resolved against `root` when relative or unset.
    #[must_use]
    pub fn resolved_db_path(&self, root: &Path) -> PathBuf {
        match &self.db_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.join("packsize.db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Zero disables the limit.
    pub time_limit_ms: u64,
    pub clock_check_mask: u64,
    /// Remainders held in memory at once (memo plus open frames). Zero
    /// disables the limit.
    pub max_states: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 0,
            clock_check_mask: crate::core::TimeLimitMonitor::DEFAULT_CLOCK_CHECK_MASK,
            max_states: crate::core::StateLimitMonitor::DEFAULT_MAX_STATES,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.time_limit_ms {
            self.time_limit_ms = value;
        }
        if let Some(value) = patch.clock_check_mask {
            self.clock_check_mask = value;
        }
        if let Some(value) = patch.max_states {
            self.max_states = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value.to_lowercase();
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub catalog: Option<CatalogPatch>,
    pub search: Option<SearchPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogPatch {
    pub backend: Option<CatalogBackend>,
    pub db_path: Option<PathBuf>,
    pub default_sizes: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub time_limit_ms: Option<u64>,
    pub clock_check_mask: Option<u64>,
    pub max_states: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub format: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_backend(value: &str) -> Result<CatalogBackend> {
    match value.trim().to_lowercase().as_str() {
        "sqlite" => Ok(CatalogBackend::Sqlite),
        "memory" => Ok(CatalogBackend::Memory),
        other => Err(PackError::Config(format!(
            "invalid PACKSIZE_CATALOG_BACKEND value {other}: expected sqlite or memory"
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|err| PackError::Config(format!("invalid {key} value {value}: {err}")))
}

/// Decimal or `0x`-prefixed hexadecimal.
fn parse_mask(key: &str, value: &str) -> Result<u64> {
    let trimmed = value.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|err| PackError::Config(format!("invalid {key} value {value}: {err}")))
}

fn parse_list(key: &str, value: &str) -> Result<Vec<u32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .parse::<u32>()
                .map_err(|err| PackError::Config(format!("invalid {key} entry {entry}: {err}")))
        })
        .collect()
}
