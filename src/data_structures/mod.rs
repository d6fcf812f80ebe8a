//! Data structures for Lanai.
//!
//! All implementations adhere to the project requirements:
//! - No unsafe code
//! - Failures reported through return values, never panics
//! - Safe to share across threads

pub mod lanai_trie;

// Re-export common data structures
pub use lanai_trie::{LanaiTrie, LanaiTrieConfig, LanaiTrieError, LanaiTrieResult};
