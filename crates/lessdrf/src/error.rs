//! Error types for the lessdrf library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lessdrf operations.
///
/// Validation outcomes (unknown terms, malformed ages) are not errors; they
/// are reported through [`crate::validation::TermValidation`] and
/// [`crate::validation::AgeValidation`].
#[derive(Debug, Error)]
pub enum SdrfError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed OBO document.
    #[error("OBO parse error at line {line}: {message}")]
    Obo { line: usize, message: String },

    /// Requested term id is absent from the loaded ontology.
    #[error("{term_id} node not in ontology")]
    TermNotFound { term_id: String },

    /// Named ontology was never registered with the repository.
    #[error("Unknown ontology: {0}")]
    UnknownOntology(String),

    /// A nested term document was not a mapping where one was required.
    #[error("Malformed term tree: {0}")]
    MalformedTree(String),

    /// Column is absent from the working table.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Two tables (or a table and a value list) disagree on row count.
    #[error("Row count mismatch: expected {expected}, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    /// Number of selected terms differs from the number requested.
    #[error("You need to select a total of {expected}, got {actual}")]
    SelectionCount { expected: usize, actual: usize },

    /// An edited cell holds a value outside its column's options.
    #[error("Value '{value}' is not an allowed choice for '{column}'")]
    InvalidChoice { column: String, value: String },

    /// A modification parameter that cannot be written in SDRF notation.
    #[error("Invalid modification '{name}': {reason}")]
    InvalidModification { name: String, reason: String },

    /// Too many samples or data files for one table.
    #[error("Too many entries: {count} exceeds the limit of {limit}")]
    LimitExceeded { count: usize, limit: usize },

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdrfError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SdrfError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a missing-term lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SdrfError::TermNotFound { .. })
    }
}

/// Result type alias for lessdrf operations.
pub type Result<T> = std::result::Result<T, SdrfError>;
