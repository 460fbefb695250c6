//! Error types for athar-core

use thiserror::Error;

/// Core error type for the schema toolkit
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Identifier failed the allow-list check
    #[error("[C001] Invalid identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config {key}: {message}")]
    ConfigInvalid { key: String, message: String },

    /// C003: Circular dependency between tables
    #[error("[C003] Circular table dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// C004: Foreign key references a table that is not part of the set
    #[error("[C004] Table '{table}' references unknown table '{referenced}'")]
    UnknownReference { table: String, referenced: String },

    /// C005: Same table defined twice
    #[error("[C005] Duplicate table definition: {name}")]
    DuplicateTable { name: String },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
