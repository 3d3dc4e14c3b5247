//! Error types for archive parsing and writing.

use thiserror::Error;

/// Errors produced by the archive reader and writer.
#[derive(Error, Debug)]
pub enum Error {
    /// No End-Of-Central-Directory signature in the trailing region.
    #[error("end of central directory signature not found")]
    MissingEndOfCentralDirectory,

    /// A structure extended past the end of the buffer.
    #[error("truncated archive: {0}")]
    Truncated(&'static str),

    /// An entry declared a compression method other than Store or Deflate.
    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u16),

    /// Entry name or payload exceeds the 32-bit limits of a classic archive.
    #[error("entry does not fit a 32-bit archive: {0}")]
    EntryTooLarge(String),

    /// Underlying I/O failure during decompression.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
