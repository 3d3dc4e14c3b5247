//! Minimal ZIP archive library for Office document containers.
//!
//! This crate provides the container layer underneath OOXML (.docx, .xlsx,
//! .pptx), ODF (.odt, .ods, .odp), and iWork (.key) extraction: a trailer-
//! anchored reader that decompresses Store and Deflate entries, and a
//! Store-only writer used to synthesize minimal word packages.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pulp_zip::{ZipReader, ZipWriter};
//!
//! // Reading
//! let data = std::fs::read("document.docx")?;
//! let archive = ZipReader::parse(&data)?;
//! let content = archive.get("word/document.xml");
//!
//! // Writing
//! let mut writer = ZipWriter::new();
//! writer.add("word/document.xml", b"<w:document/>")?;
//! let bytes = writer.finish();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![forbid(unsafe_code)]

mod crc;
mod errors;
mod reader;
mod writer;

pub use crc::crc32;
pub use errors::Error;
pub use reader::ZipReader;
pub use writer::ZipWriter;

/// Result type for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
