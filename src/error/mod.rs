//! Error handling for packsize.
//!
//! This module provides:
//! - [`PackError`]: The main error enum for all packsize operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

/// Main error type for packsize operations.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Package catalog is empty")]
    EmptyCatalog,

    #[error("Invalid order amount: {0}")]
    InvalidOrder(String),

    #[error("No candidate combination found for order {order}")]
    NoCandidatesFound { order: u64 },

    #[error("Invalid package size: {0}")]
    InvalidSize(i64),

    #[error("Package size {0} already exists")]
    DuplicateSize(u32),

    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Invalid package id: {0}")]
    InvalidPackageId(String),

    #[error("Search stopped: {0}")]
    SearchInterrupted(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PackError {
    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Serialization(_) => ErrorCode::SerializationError,
            Self::EmptyCatalog => ErrorCode::CatalogEmpty,
            Self::InvalidOrder(_) => ErrorCode::InvalidOrder,
            Self::NoCandidatesFound { .. } => ErrorCode::NoCandidatesFound,
            Self::InvalidSize(_) => ErrorCode::InvalidSize,
            Self::DuplicateSize(_) => ErrorCode::DuplicateSize,
            Self::PackageNotFound(_) => ErrorCode::PackageNotFound,
            Self::InvalidPackageId(_) => ErrorCode::InvalidPackageId,
            Self::SearchInterrupted(_) => ErrorCode::SearchInterrupted,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::Migration(_) => ErrorCode::MigrationFailed,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::InvalidOrder(amount) => Some(serde_json::json!({ "amount": amount })),
            Self::NoCandidatesFound { order } => Some(serde_json::json!({ "order": order })),
            Self::InvalidSize(size) => Some(serde_json::json!({ "size": size })),
            Self::DuplicateSize(size) => Some(serde_json::json!({ "size": size })),
            Self::PackageNotFound(id) | Self::InvalidPackageId(id) => {
                Some(serde_json::json!({ "package_id": id }))
            }
            Self::SearchInterrupted(reason) => Some(serde_json::json!({ "reason": reason })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_pack_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// This is what machine output mode prints when a command fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "PACKAGE_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "catalog", "config", "search")
    pub category: String,
}

impl StructuredError {
    /// Create a structured error from a [`PackError`].
    #[must_use]
    pub fn from_pack_error(err: &PackError) -> Self {
        let code = err.code();
        let context = err.context();

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion: suggest_for_error(code, context.as_ref()),
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }
}

/// Suggestion for `code`, specialised with whatever `context` carries.
#[must_use]
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    let field = |name: &str| context.and_then(|ctx| ctx.get(name)).map(value_text);

    match code {
        ErrorCode::PackageNotFound => field("package_id").map_or_else(
            || code.suggestion().to_string(),
            |id| format!("No package with id '{id}'. Run `packsize list` to see existing ids"),
        ),
        ErrorCode::DuplicateSize => field("size").map_or_else(
            || code.suggestion().to_string(),
            |size| {
                format!(
                    "Size {size} is already in the catalog. Use `packsize update <id> <size>` to change an entry"
                )
            },
        ),
        _ => code.suggestion().to_string(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Result type alias using PackError.
pub type Result<T> = std::result::Result<T, PackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_error_code_mapping() {
        assert_eq!(PackError::EmptyCatalog.code(), ErrorCode::CatalogEmpty);
        assert_eq!(
            PackError::InvalidOrder("0".into()).code(),
            ErrorCode::InvalidOrder
        );
        assert_eq!(PackError::DuplicateSize(250).code(), ErrorCode::DuplicateSize);
        assert_eq!(
            PackError::NoCandidatesFound { order: 3 }.code(),
            ErrorCode::NoCandidatesFound
        );
        assert_eq!(PackError::Config("bad".into()).code(), ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_pack_error_context() {
        let err = PackError::PackageNotFound("abc".into());
        let ctx = err.context().unwrap();
        assert_eq!(ctx.get("package_id").unwrap(), "abc");
        assert!(PackError::EmptyCatalog.context().is_none());
    }

    #[test]
    fn test_structured_error_from_pack_error() {
        let err = PackError::DuplicateSize(500);
        let structured = StructuredError::from_pack_error(&err);

        assert_eq!(structured.code, ErrorCode::DuplicateSize);
        assert_eq!(structured.numeric_code, 102);
        assert!(structured.message.contains("500"));
        assert!(structured.suggestion.contains("500"));
        assert!(structured.recoverable);
        assert_eq!(structured.category, "catalog");
    }

    #[test]
    fn test_structured_error_serialization() {
        let err = PackError::InvalidOrder("-4".into()).to_structured();
        let json = serde_json::to_string(&err).unwrap();

        assert!(json.contains("INVALID_ORDER"));
        assert!(json.contains("\"numeric_code\":201"));
        assert!(json.contains("\"recoverable\":true"));
        assert!(json.contains("\"category\":\"order\""));
        assert!(json.contains("\"amount\":\"-4\""));
    }

    #[test]
    fn test_structured_error_without_context_omits_field() {
        let json = serde_json::to_string(&PackError::EmptyCatalog.to_structured()).unwrap();
        assert!(!json.contains("context"));
    }

    #[test]
    fn test_suggestion_uses_package_id() {
        let err = PackError::PackageNotFound("1234".into()).to_structured();
        assert!(err.context.is_some());
        assert!(err.suggestion.contains("1234"));
    }

    #[test]
    fn test_structured_error_display() {
        let err = PackError::EmptyCatalog.to_structured();
        let display = format!("{err}");
        assert!(display.contains("E105"));
        assert!(display.contains("empty"));
    }

    #[test]
    fn test_interrupted_search_is_recoverable() {
        let structured = PackError::SearchInterrupted("stop".into()).to_structured();
        assert_eq!(structured.code, ErrorCode::SearchInterrupted);
        assert!(structured.recoverable);
        assert_eq!(structured.category, "search");
        assert!(structured.suggestion.contains("max_states"));
    }

    #[test]
    fn test_config_errors_share_one_code() {
        let structured = PackError::Config("missing [search] section".into()).to_structured();
        assert_eq!(structured.code, ErrorCode::ConfigInvalid);
        assert_eq!(structured.numeric_code, 302);
    }
}
