//! Error types for the Lanai Trie.
//!
//! Every variant is an expected outcome of a trie operation. The boolean
//! API on [`super::LanaiTrie`] folds all of them into `false`/`None`; the
//! `try_*` API reports which one happened.

/// Errors that can occur in Lanai Trie operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanaiTrieError {
    /// Error when an empty key is provided.
    #[error("Empty key not allowed")]
    EmptyKey,

    /// No node exists for some character of the key.
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// The key already holds a value; values are never overwritten.
    #[error("Key already present: {0}")]
    DuplicateKey(String),

    /// The key holds a value of a different type than the one requested.
    #[error("Type mismatch for key '{key}': requested {expected}, stored {actual}")]
    TypeMismatch {
        /// The key that was read.
        key: String,
        /// The requested type.
        expected: &'static str,
        /// The type the value was inserted as.
        actual: &'static str,
    },

    /// The key exists only as a prefix of longer keys.
    #[error("Key is not terminal: {0}")]
    NotTerminal(String),

    /// Error when a key exceeds the configured maximum length.
    #[error("Key '{key}' exceeds maximum key length of {max_len}")]
    KeyTooLong {
        /// The key that was too long.
        key: String,
        /// The maximum allowed length in characters.
        max_len: usize,
    },
}
