//! Error types used by this crate.

use std::{io, path::PathBuf, process::ExitStatus, time::Duration};

use thiserror::Error;

/// Custom error type returned by the collaborators around a scan (settings, persisted library,
/// launching). A scan itself never fails.
#[derive(Error, Debug)]
pub enum GameScannerError {
    /// Error originating from [`io::Error`]
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Error originating from [`serde_json::Error`]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Error originating from any other source
    #[error("Other error: {0}")]
    Other(String),
}

/// Reasons a native icon extraction attempt can fail. These never escape the icon resolver.
#[derive(Error, Debug)]
pub enum IconExtractionError {
    #[error("no native icon extractor is available on this platform")]
    Unsupported,

    #[error("failed to start the icon extractor: {0}")]
    Spawn(#[source] io::Error),

    #[error("icon extractor did not finish within {0:?}")]
    Timeout(Duration),

    #[error("icon extractor exited with {status}: {stderr}")]
    Failed { status: ExitStatus, stderr: String },

    #[error("icon extractor reported success but wrote nothing to {0:?}")]
    MissingOutput(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),
}
