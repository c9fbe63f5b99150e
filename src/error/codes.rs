//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Catalog errors
//! - 2xx: Order errors
//! - 3xx: Config errors
//! - 4xx: Search errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for machine output.
///
/// Each variant maps to a numeric code (e.g., `PackageNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Catalog errors (1xx)
    // ========================================
    /// E101: No catalog entry has the requested id
    PackageNotFound,
    /// E102: A catalog entry with the same size already exists
    DuplicateSize,
    /// E103: Package size is zero or negative
    InvalidSize,
    /// E104: Package id is not a valid UUID
    InvalidPackageId,
    /// E105: The catalog holds no package sizes
    CatalogEmpty,

    // ========================================
    // Order errors (2xx)
    // ========================================
    /// E201: Order amount is zero or negative
    InvalidOrder,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,

    // ========================================
    // Search errors (4xx)
    // ========================================
    /// E401: A search monitor stopped the optimizer
    SearchInterrupted,
    /// E402: The explorer produced no terminal candidates
    NoCandidatesFound,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E604: Database operation failed
    DatabaseError,
    /// E605: Serialization/deserialization failed
    SerializationError,
    /// E606: Schema migration failed
    MigrationFailed,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `PackageNotFound` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::PackageNotFound => 101,
            Self::DuplicateSize => 102,
            Self::InvalidSize => 103,
            Self::InvalidPackageId => 104,
            Self::CatalogEmpty => 105,

            Self::InvalidOrder => 201,

            Self::ConfigInvalid => 302,

            Self::SearchInterrupted => 401,
            Self::NoCandidatesFound => 402,

            Self::DatabaseError => 604,
            Self::SerializationError => 605,
            Self::MigrationFailed => 606,

            Self::InternalError => 901,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::PackageNotFound => "Run `packsize list` to see the ids of all catalog entries",
            Self::DuplicateSize => "Each size may appear once. Use `packsize update <id> <size>` to change an existing entry",
            Self::InvalidSize => "Package size must be a positive integer greater than 0",
            Self::InvalidPackageId => "Package ids are UUIDs as printed by `packsize list`",
            Self::CatalogEmpty => "Add package sizes with `packsize add <size>...` or `packsize add --defaults`",

            Self::InvalidOrder => "Amount must be a positive integer greater than 0",

            Self::ConfigInvalid => "Run `packsize config` to see current values. Check TOML syntax in config file",

            Self::SearchInterrupted => "Raise [search].time_limit_ms or [search].max_states, or set them to 0 to disable the limit",
            Self::NoCandidatesFound => "The optimizer found no combination. Please report this with the catalog contents",

            Self::DatabaseError => "Check that the catalog database is readable and not locked by another process",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::MigrationFailed => "The catalog database schema could not be upgraded. Move the database aside and retry",

            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::PackageNotFound
            | Self::DuplicateSize
            | Self::InvalidSize
            | Self::InvalidPackageId
            | Self::CatalogEmpty
            | Self::InvalidOrder
            | Self::ConfigInvalid
            | Self::SearchInterrupted
            | Self::DatabaseError
            | Self::IoError => true,

            Self::NoCandidatesFound
            | Self::SerializationError
            | Self::MigrationFailed
            | Self::InternalError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "catalog",
            2 => "order",
            3 => "config",
            4 => "search",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    #[cfg(test)]
    pub(crate) fn all() -> impl Iterator<Item = Self> {
        [
            Self::PackageNotFound,
            Self::DuplicateSize,
            Self::InvalidSize,
            Self::InvalidPackageId,
            Self::CatalogEmpty,
            Self::InvalidOrder,
            Self::ConfigInvalid,
            Self::SearchInterrupted,
            Self::NoCandidatesFound,
            Self::DatabaseError,
            Self::SerializationError,
            Self::MigrationFailed,
            Self::InternalError,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
