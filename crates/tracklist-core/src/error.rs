//! Error types for tracklist.
//!
//! The list engine itself never returns errors: index and anchor misuse are
//! programmer errors and panic. The fallible surface is configuration, where
//! files are read, parsed, and validated.

use std::path::PathBuf;

/// Result type alias for tracklist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, validating, or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text could not be parsed.
    #[error("Failed to parse configuration{}: {message}", display_path(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// A configuration value is out of range or malformed.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// A column type has no registered comparator/renderer entry.
    #[error("Unknown column type '{0}'")]
    UnknownColumn(String),
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" '{}'", path.display()),
        None => String::new(),
    }
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a parse error, optionally naming the file it came from.
    pub fn parse(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path,
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serialize(message: impl Into<String>) -> Self {
        Self::Serialize(message.into())
    }

    /// Create a value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an unknown-column error.
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }
}
