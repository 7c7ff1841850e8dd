//! Error types for dipper.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for dipper operations.
///
/// Extraction and assembly never fail; errors only come from the build
/// driver (file I/O, configuration) and from host cancellation.
#[derive(Debug, Error)]
pub enum DipperError {
    /// Reading a query file or writing generated output failed.
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed `dipper.toml`.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Two query files emit the same type name.
    #[error("Duplicate query type '{type_name}' (declared in '{first}' and '{second}')")]
    DuplicateQuery {
        type_name: String,
        first: String,
        second: String,
    },

    /// A required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    /// The host asked generation to stop.
    #[error("Generation cancelled")]
    Cancelled,
}

impl DipperError {
    /// Create an IO error tied to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single-row helper matched more than one row.
///
/// Generated code returns it inside `sqlx::Error::Decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected exactly one row, got {count}")]
pub struct TooManyRows {
    pub count: usize,
}

/// Result type alias for dipper operations.
pub type DipperResult<T> = Result<T, DipperError>;
