//! Legacy pre-XML Office binaries (.doc, .dot, .ppt, .pps, .pot, .xls,
//! .xlt).
//!
//! These formats are not parsed structurally. A conversion orchestrator
//! tries external converters first and falls back to heuristic salvage:
//! printable runs recovered from the raw bytes under three encoding
//! interpretations, repackaged into a minimal synthetic word package so
//! the result flows through the ordinary word extractor.

pub mod convert;
pub mod package;
pub mod salvage;

pub use convert::{convert_to_docx, Conversion};
