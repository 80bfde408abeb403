//! Error types for code generation

use fsmgen_core::Diagnostics;
use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse a YAML description
    #[error("failed to parse description: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Failed to parse a JSON description
    #[error("failed to parse description: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Description file with an extension the parser does not know
    #[error("unsupported description format: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat {
        /// Path of the file
        path: String,
    },

    /// The description failed validation
    #[error("invalid description '{machine}': {diagnostics}")]
    InvalidDescription {
        /// Machine name from the description
        machine: String,
        /// Everything validation found
        diagnostics: Diagnostics,
    },

    /// Failed to generate Rust code
    #[error("code generation failed: {0}")]
    GenerationError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
