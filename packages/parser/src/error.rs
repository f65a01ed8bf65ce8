//! Error types for the feed parser.
//!
//! `FeedError` is returned by every fallible stage. The parser itself never
//! surfaces it to callers: [`crate::parser::parse`] converts it into an
//! [`ErrorInfo`] stored on the bozo result.

use std::error::Error as _;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Main error type for the feed parser library.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The root element and namespace did not map to a known feed format.
    #[error("Unable to classify document with root <{root}> (detected '{detected}')")]
    Classification { root: String, detected: String },

    /// The document is not well-formed XML.
    #[error("XML parsing failed: {0}")]
    Syntax(#[from] roxmltree::Error),

    /// A field handler failed while processing an element.
    #[error("Handler for <{tag}> failed: {message}")]
    Handler { tag: String, message: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// All retry attempts failed.
    #[error("Request failed after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// The server answered `304 Not Modified` where a body was required.
    #[error("Feed not modified: {0}")]
    NotModified(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// The benchmark worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid command-line or option value.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Result type alias for feed parser operations.
pub type Result<T> = std::result::Result<T, FeedError>;

/// Coarse category recorded on a bozo result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Classification,
    Syntax,
    Handler,
    Other,
}

impl From<&FeedError> for ErrorKind {
    fn from(err: &FeedError) -> Self {
        match err {
            FeedError::Classification { .. } => ErrorKind::Classification,
            FeedError::Syntax(_) => ErrorKind::Syntax,
            FeedError::Handler { .. } => ErrorKind::Handler,
            _ => ErrorKind::Other,
        }
    }
}

/// Pipeline stage in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    XmlParse,
    Classify,
    Feed,
    Entries,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::XmlParse => "xml-parse",
            Stage::Classify => "classify",
            Stage::Feed => "feed",
            Stage::Entries => "entries",
        };
        f.write_str(name)
    }
}

/// Error description attached to a degraded (bozo) parse result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub stage: Stage,
    pub message: String,
    /// Stage line, the error itself and every `source()` below it.
    pub trace: String,
}

impl ErrorInfo {
    /// Capture an error raised during `stage`.
    #[must_use]
    pub fn capture(stage: Stage, err: &FeedError) -> Self {
        let mut trace = format!("stage: {stage}\nerror: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push_str("\ncaused by: ");
            trace.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            kind: ErrorKind::from(err),
            stage,
            message: err.to_string(),
            trace,
        }
    }
}
