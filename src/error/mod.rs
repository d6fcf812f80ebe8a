//! Error module for Lanai.
//!
//! This module provides the application-level error type and a small error
//! reporting framework. Trie operations report their own
//! [`LanaiTrieError`](crate::data_structures::LanaiTrieError); it is wrapped
//! here only where it crosses into configuration or script handling.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use thiserror::Error;

use crate::data_structures::LanaiTrieError;

pub mod config;
pub mod script;

/// Result type alias used throughout Lanai.
pub type LanaiResult<T> = Result<T, LanaiError>;

/// Core error enum for Lanai.
#[derive(Error, Debug)]
pub enum LanaiError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A trie operation failed where the caller required it to succeed.
    #[error("Trie error: {0}")]
    Trie(#[from] LanaiTrieError),

    /// Errors loading or parsing an operation script.
    #[error("Script error: {0}")]
    Script(#[from] script::ScriptError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

/// Error reporting structure to provide context and debugging information.
#[derive(Debug)]
pub struct ErrorContext {
    /// The original error that occurred.
    pub error: LanaiError,

    /// The component where the error occurred.
    pub component: String,

    /// Additional context information to help with debugging.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Creates a new error context with the given error and component.
    pub fn new<S: Into<String>>(error: LanaiError, component: S) -> Self {
        Self {
            error,
            component: component.into(),
            details: None,
        }
    }

    /// Adds detail information to the error context.
    pub fn with_details<S: Into<String>>(mut self, details: S) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error in {}: {}", self.component, self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        Ok(())
    }
}

/// Error reporter trait for reporting errors to various sinks.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug {
    /// Report an error with context.
    fn report(&self, context: ErrorContext);
}

/// A simple error reporter implementation that logs errors using the tracing framework.
#[derive(Default, Debug)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, context: ErrorContext) {
        tracing::error!(
            error = %context.error,
            component = %context.component,
            details = context.details.as_deref().unwrap_or("None"),
            "Error reported"
        );
    }
}

/// Global error reporter accessor.
#[derive(Debug, Default)]
pub struct ErrorReporting {
    reporter: RwLock<Option<Arc<dyn ErrorReporter>>>,
}

impl ErrorReporting {
    /// Set the error reporter, replacing any previous one.
    pub fn set_reporter(&self, reporter: Arc<dyn ErrorReporter>) {
        *self.reporter.write() = Some(reporter);
    }

    /// Report an error with context.
    pub fn report(&self, context: ErrorContext) {
        let reporter = self.reporter.read().clone();
        match reporter {
            Some(reporter) => reporter.report(context),
            // Fallback to standard error output if no reporter is configured
            None => eprintln!("Error: {context}"),
        }
    }
}

static ERROR_REPORTING: Lazy<ErrorReporting> = Lazy::new(ErrorReporting::default);

/// Get the global error reporting instance.
pub fn get_error_reporting() -> &'static ErrorReporting {
    &ERROR_REPORTING
}

/// Set the global error reporter.
pub fn set_error_reporter(reporter: Arc<dyn ErrorReporter>) {
    ERROR_REPORTING.set_reporter(reporter);
}
