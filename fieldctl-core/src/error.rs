//! Structured error types for fieldctl-core.
//!
//! The library reports every failure through [`FieldError`]; the `fieldctl`
//! binary wraps these in `anyhow` with command-level context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fieldctl-core operations
#[derive(Error, Debug)]
pub enum FieldError {
    /// A field with this name is already registered
    #[error("Field '{name}' is already registered")]
    DuplicateName { name: String },

    /// The named field (or order-by / statistic entry) does not exist
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Only grouped (active) fields can be ordered
    #[error("Field '{name}' is not grouped; check it before adding it to the order-by list")]
    NotGrouped { name: String },

    /// The field is already in the order-by list
    #[error("Field '{name}' has already been added to the order-by list")]
    AlreadyOrdered { name: String },

    /// The (field, statistic) combination has already been chosen
    #[error("Statistic {statistic} on '{field}' has already been chosen")]
    DuplicateStatistic { field: String, statistic: String },

    /// A statistics query needs at least one definition
    #[error("Define at least one statistic for the query")]
    NoStatistics,

    /// Unknown statistic type name
    #[error("Invalid statistic type '{value}'")]
    InvalidStatistic { value: String },

    /// Unknown sort order name
    #[error("Invalid sort order '{value}' (expected asc or desc)")]
    InvalidSortOrder { value: String },

    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Schema file or directory not found
    #[error("Path not found: {path:?}")]
    PathNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for fieldctl-core operations
pub type Result<T> = std::result::Result<T, FieldError>;

impl FieldError {
    /// Create a duplicate field name error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create a missing field error
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Field",
            name: name.into(),
        }
    }

    /// Create a missing order-by entry error
    pub fn order_by_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Order-by field",
            name: name.into(),
        }
    }

    /// Create a missing statistic definition error
    pub fn statistic_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "Statistic definition",
            name: name.into(),
        }
    }

    pub fn not_grouped(name: impl Into<String>) -> Self {
        Self::NotGrouped { name: name.into() }
    }

    pub fn already_ordered(name: impl Into<String>) -> Self {
        Self::AlreadyOrdered { name: name.into() }
    }

    pub fn duplicate_statistic(field: impl Into<String>, statistic: impl Into<String>) -> Self {
        Self::DuplicateStatistic {
            field: field.into(),
            statistic: statistic.into(),
        }
    }

    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a path not found error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True for the "missing name" family, regardless of which list was searched
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldError::field_not_found("Region");
        assert_eq!(err.to_string(), "Field 'Region' not found");

        let err = FieldError::duplicate_statistic("POP2007", "SUM");
        assert_eq!(
            err.to_string(),
            "Statistic SUM on 'POP2007' has already been chosen"
        );

        let err = FieldError::order_by_not_found("Status");
        assert!(err.is_not_found());
        assert!(err.to_string().starts_with("Order-by field"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let field_err: FieldError = io_err.into();

        assert!(matches!(field_err, FieldError::Io { .. }));
    }
}
