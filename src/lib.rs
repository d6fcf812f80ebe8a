//! Lanai Library
//!
//! This library contains the Lanai Trie, a concurrent prefix tree mapping
//! string keys to values of heterogeneous types, together with the
//! configuration, error reporting, and script runner used by the `lanai`
//! binary.
//!
//! # Architecture
//!
//! - `data_structures::lanai_trie` is the core and depends on nothing else
//!   in the crate.
//! - `config` and `error` carry the application-level concerns.
//! - `script` drives a trie from a TOML description of operations.

pub mod config;
pub mod data_structures;
pub mod error;
pub mod script;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;
