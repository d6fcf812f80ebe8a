// Copyright (c) 2025 Lanai Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the Lanai Trie.

use serde::{Deserialize, Serialize};

/// Configuration options for the Lanai Trie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanaiTrieConfig {
    /// Maximum key length in characters, which also bounds the depth of the
    /// tree. `None` means unlimited.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_key_len: Option<usize>,
}

impl LanaiTrieConfig {
    /// Create a new default configuration (no key length limit).
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit keys to `max_key_len` characters.
    pub fn with_max_key_len(mut self, max_key_len: usize) -> Self {
        if max_key_len == 0 {
            panic!("Maximum key length must be greater than 0");
        }
        self.max_key_len = Some(max_key_len);
        self
    }

    /// Remove any key length limit.
    pub fn unbounded(mut self) -> Self {
        self.max_key_len = None;
        self
    }

    /// Get the maximum key length, if any.
    pub fn max_key_len(&self) -> Option<usize> {
        self.max_key_len
    }
}
