//! Error types for Coursemap operations.
//!
//! This module provides the main error type [`CoursemapError`] which wraps
//! the failures that can occur around a layout: reading input, decoding the
//! catalog, validating configuration and exporting results. The layout
//! computation itself never fails.

use std::io;

use thiserror::Error;

/// The main error type for Coursemap operations.
///
/// # Diagnostic Variants
///
/// The `Input` variant keeps the source text next to the decoding error so
/// the line and column reported by `serde_json` can be turned into a labeled
/// span by error reporters.
#[derive(Debug, Error)]
pub enum CoursemapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid catalog: {err}")]
    Input { err: serde_json::Error, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for CoursemapError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl CoursemapError {
    /// Create a new `Input` error with the associated source text.
    pub fn new_input_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Input {
            err,
            src: src.into(),
        }
    }
}
