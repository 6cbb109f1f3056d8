//! Fatal error conditions of the extraction pipeline.
//!
//! Data-quality problems are not errors: they are recorded as diagnostics and only
//! become an [`ExtractError::Unsupported`] when strict mode is on. Everything here
//! aborts the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The project manifest could not be read or is malformed.
    #[error("Invalid project manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    /// A source file failed to parse (fatal in strict mode only).
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// One or more unsupported constructs were found while strict mode is on.
    #[error("{unit}: {}", messages.join("\n"))]
    Unsupported { unit: String, messages: Vec<String> },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Two configurations share `(library, name)` but differ in content.
    #[error("Duplicate (library, name) tuples are not allowed:\n{}", duplicates.join("\n"))]
    DuplicateConfiguration { duplicates: Vec<String> },

    /// An output document does not satisfy its JSON schema.
    #[error("{document} metadata is not valid against its JSON schema:\n{}", errors.join("\n"))]
    Schema {
        document: String,
        errors: Vec<String>,
    },
}

impl ExtractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ExtractError> = std::result::Result<T, E>;
