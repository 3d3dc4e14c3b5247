//! Pulp - document text extraction for heterogeneous containers
//!
//! This library extracts human-readable text and structural metadata
//! from office-style document containers so downstream logic can work
//! with plain text regardless of source format.
//!
//! # Features
//!
//! - **Archive codec**: ZIP container reader and Store-only writer
//! - **OOXML extractors**: Word (.docx), presentation (.pptx), and
//!   spreadsheet (.xlsx) packages with shared-string and sheet-name
//!   resolution
//! - **OpenDocument / Keynote**: single-part markup flattening
//! - **Legacy salvage**: heuristic text recovery from pre-XML binaries
//!   (.doc, .ppt, .xls), repackaged through a synthetic word package
//! - **PDF pipeline**: CLI fast path, embedded parser, and OCR
//!   fallback, with page limits and character budgets
//!
//! # Example
//!
//! ```no_run
//! use pulp::{extract_file, ExtractionConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractionConfig::default();
//! let doc = extract_file("report.docx".as_ref(), &config)?;
//! println!("{}", doc.text);
//! if doc.truncated_by_characters {
//!     println!("(text was truncated)");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - PDF with an explicit page limit
//!
//! ```no_run
//! use pulp::{extract_file, ExtractionConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExtractionConfig {
//!     page_limit: 10,
//!     ..Default::default()
//! };
//! let doc = extract_file("scan.pdf".as_ref(), &config)?;
//! println!("{} ({} metadata fields)", doc.text, doc.metadata.len());
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod config;
pub mod document;
pub mod extractor;
pub mod iwork;
pub mod legacy;
pub mod odf;
pub mod ooxml;
pub mod pdf;

pub use common::{Error, Result, ScratchDir};
pub use config::ExtractionConfig;
pub use document::{ExtractedDocument, ExtractorKind, MetaValue, OcrMetadata};
pub use extractor::{extract_file, FileCategory};
