//! Test modules for Lanai.
//!
//! This module contains the crate-internal test suites:
//! - Behavioural tests for the Lanai Trie, including model-based proptests
//! - Configuration loading and validation tests
//! - Error reporting tests
//! - Script parsing and execution tests

pub mod script_tests;
