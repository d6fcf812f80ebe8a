//! Script error module.
//!
//! Errors raised while reading or interpreting an operation script. Failed
//! trie operations inside a script are outcomes, not errors, and are never
//! reported through this type.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading an operation script.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Error when the script file is missing.
    #[error("Script file not found: {0}")]
    FileNotFound(PathBuf),

    /// Error when the script is not valid TOML or does not match the schema.
    #[error("Failed to parse script: {0}")]
    ParseError(String),

    /// Error when the script file exists but cannot be read.
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
}
