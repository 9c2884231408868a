//! Error types for the product loader.
//!
//! This module defines one error type per stage of a run:
//!
//! - [`SourceError`] - Opening or reading the CSV file
//! - [`RecordError`] - Turning a row into a product record
//! - [`SinkError`] - HTTP client and transport errors
//! - [`ConfigError`] - Invalid settings from the environment
//! - [`SubmitError`] - Top-level run errors
//!
//! Every error is fatal: the run stops at the first one. Conversion into
//! [`SubmitError`] is automatic via `From`, so `?` works across stages.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while opening or reading the CSV source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The CSV file could not be opened.
    #[error("Cannot open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be read (bad quoting, invalid UTF-8, I/O failure).
    #[error("Cannot read CSV record at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

// =============================================================================
// Record Errors
// =============================================================================

/// Errors while mapping a row to a product record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The row is shorter than the fixed product layout.
    #[error("Line {line}: expected {expected} fields, found {found}")]
    MissingField {
        line: u64,
        found: usize,
        expected: usize,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors from the HTTP sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The HTTP client could not be built.
    #[error("Cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or no response arrived.
    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("Cannot read response body: {0}")]
    Body(#[source] reqwest::Error),
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors in settings read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Timeout is not a positive whole number of seconds.
    #[error("Invalid timeout '{value}': expected a positive number of seconds")]
    InvalidTimeout { value: String },
}

// =============================================================================
// Submit Errors (top-level)
// =============================================================================

/// Top-level run errors.
///
/// This is the error type returned by [`crate::submit::submit_all`] and
/// [`crate::submit::preview_all`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// CSV source error.
    #[error("CSV error: {0}")]
    Source(#[from] SourceError),

    /// Row mapping error.
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// HTTP sink error.
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Writing to the console failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// A row failed after some rows had already been submitted.
    #[error("{source} (stopped after {submitted} submitted rows)")]
    Aborted {
        submitted: usize,
        #[source]
        source: Box<SubmitError>,
    },
}

impl SubmitError {
    /// Number of rows submitted before the run stopped.
    pub fn submitted(&self) -> usize {
        match self {
            SubmitError::Aborted { submitted, .. } => *submitted,
            _ => 0,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV source operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for record mapping.
pub type RecordResult<T> = Result<T, RecordError>;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Result type for a whole run.
pub type SubmitResult<T> = Result<T, SubmitError>;
