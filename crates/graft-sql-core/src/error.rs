//! Error types for statement building and rendering.

use thiserror::Error;

/// Errors produced while building or rendering a statement.
///
/// Validation failures surface at build time, before any SQL text exists.
/// Dialect capability failures surface at render time, and rendering never
/// returns partial SQL alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The statement model is inconsistent with the table schema.
    #[error("validation error: {0}")]
    Validation(String),

    /// The statement requests something the target dialect cannot express.
    #[error("unsupported feature for dialect {dialect}: {feature}")]
    UnsupportedFeature {
        /// The dialect that rejected the statement.
        dialect: &'static str,
        /// The unsupported construct.
        feature: &'static str,
    },
}

impl Error {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a validation error for a column not present on a table.
    #[must_use]
    pub fn unknown_column(table: &str, column: &str) -> Self {
        Self::Validation(format!("table {table} has no column named {column}"))
    }
}

/// Result type alias for statement building and rendering.
pub type Result<T> = std::result::Result<T, Error>;
