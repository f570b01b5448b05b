//! Error types for the parsegen generator.

use std::path::PathBuf;

use parsegen_define::DefineError;
use thiserror::Error;

/// Errors that abort a generation pass.
///
/// Per-declaration problems are not errors at this level; they are collected
/// as [`crate::registry::Diagnostic`]s so every offending class is reported in
/// one run. [`GeneratorError::Rejected`] summarizes them once the pass is over.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Failed to read the configuration file
    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A manifest or type definition could not be loaded
    #[error(transparent)]
    Define(#[from] DefineError),

    /// A Java source file could not be scanned
    #[error("Failed to scan '{path}': {reason}")]
    Scan { path: PathBuf, reason: String },

    /// Directory traversal failed
    #[error("Failed to walk source directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the declarative output
    #[error("Failed to serialize declarative output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// One or more parser declarations were rejected.
    #[error("{count} parser declaration(s) rejected")]
    Rejected {
        /// Number of diagnostics reported.
        count: usize,
    },

    /// Two synthesized methods share an erased signature.
    ///
    /// Overloads are only distinguishable by parameter types after erasure;
    /// when two methods agree on name and erased parameters the output could
    /// never compile, so generation stops instead of dropping one.
    #[error(
        "Generated method '{signature}' from parser '{second}' collides with the same signature from parser '{first}'"
    )]
    SignatureCollision {
        /// The colliding signature, `name(ErasedType, ...)`.
        signature: String,
        /// Class that produced the first method.
        first: String,
        /// Class that produced the second method.
        second: String,
    },
}
