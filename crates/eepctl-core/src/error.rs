//! Error types for eepctl-core
//!
//! Out-of-range image access is never an error: reads yield `None` and
//! writes are dropped. Everything in this enum is surfaced to the caller.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Field name is not declared by the schema
    #[error("unknown field: {name}")]
    UnknownField {
        /// The name that was looked up
        name: String,
    },

    /// Reading or writing a backing file failed
    #[error("{}: {source}", path.display())]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Schema or export document is not valid JSON for the expected shape
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema document is not valid TOML for the expected shape
    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    /// Requested layout is not present in the schema document
    #[error("layout '{name}' not found (available: {})", available.join(", "))]
    LayoutNotFound {
        /// Requested layout name
        name: String,
        /// Layout names present in the document
        available: Vec<String>,
    },

    /// Document holds several layouts and none was selected
    #[error("schema document holds several layouts, select one of: {}", available.join(", "))]
    AmbiguousLayout {
        /// Layout names present in the document
        available: Vec<String>,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
