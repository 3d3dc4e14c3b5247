//! Common types and utilities shared across format extractors.
//!
//! This module provides the unified error type, the lightweight XML
//! scanning helpers every package-format extractor is built on, scoped
//! scratch directories, and the per-process warn-once registry for
//! missing external tools.

// Submodule declarations
pub mod error;
pub(crate) mod process;
pub mod scratch;
pub mod warnings;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use scratch::ScratchDir;
