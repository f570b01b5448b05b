//! Error types for parser metadata definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading parser metadata.
#[derive(Debug, Error)]
pub enum DefineError {
    /// Type text could not be parsed as a Java type.
    #[error("Invalid type '{input}': {reason}")]
    InvalidType {
        /// The text that failed to parse.
        input: String,
        /// What the parser expected.
        reason: String,
    },

    /// A manifest file could not be read.
    #[error("Failed to read manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest file could not be deserialized.
    #[error("Failed to parse manifest '{path}': {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    /// The manifest extension does not map to a supported format.
    #[error("Unsupported manifest format for '{path}' (expected .toml, .json, .yaml or .yml)")]
    UnsupportedManifest { path: PathBuf },
}
