//! Unified error type for the extraction engine.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for extraction operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive container is structurally unreadable (no EOCD record)
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    /// Archive entry uses a compression method other than Store or Deflate
    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u16),

    /// Legacy-binary salvage produced zero lines of text
    #[error("no extractable content in {}", .0.display())]
    NoExtractableContent(PathBuf),

    /// Required external binary is missing (recoverable via fallback)
    #[error("external tool '{0}' is not available")]
    ExternalToolUnavailable(&'static str),

    /// External binary ran but exited non-zero or produced unusable output
    #[error("external tool '{tool}' failed: {reason}")]
    ExternalToolFailed {
        tool: &'static str,
        reason: String,
    },

    /// Embedded parser rejected the document
    #[error("parse failure: {0}")]
    ParseFailure(String),

    /// File extension maps to no known extractor
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
