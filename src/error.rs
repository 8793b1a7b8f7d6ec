//! Error types for the string analyzer

use thiserror::Error;

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur in analyzer operations
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Malformed or missing input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input present but of the wrong type
    #[error("Invalid type: {0}")]
    InvalidType(String),

    /// Content hash already stored
    #[error("String already exists: {0}")]
    Duplicate(String),

    /// Lookup or delete target absent
    #[error("String not found: {0}")]
    NotFound(String),

    /// No translator rule matched the query
    #[error("Unable to parse natural language query: {0}")]
    UnparsableQuery(String),

    /// Translated query produced contradictory filters
    #[error("Query parsed but resulted in conflicting filters: {0}")]
    ConflictingFilters(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyzerError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a duplicate error
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Check if the caller sent malformed or mistyped input
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidType(_))
    }

    /// Check if natural-language translation failed
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::UnparsableQuery(_) | Self::ConflictingFilters(_))
    }
}
