//! Error types for the spec sheet converter

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the spec sheet converter
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Measurement payload could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages")]
    EmptyPdf,

    /// The browser could not be provisioned or launched
    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    /// A tab or protocol call failed
    #[error("Browser error: {0}")]
    Browser(String),

    /// The layout engine reported heights we cannot use
    #[error("Measurement failed: {0}")]
    Measurement(String),

    /// Requested page count is out of range
    #[error("Invalid page count: {0}")]
    InvalidPageCount(usize),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Wrap an error reported by the browser driver
    pub(crate) fn browser(err: impl std::fmt::Display) -> Self {
        Error::Browser(err.to_string())
    }
}
