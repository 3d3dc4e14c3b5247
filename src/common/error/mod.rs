//! Unified error types for the extraction engine.
//!
//! This module provides a single error type spanning container parsing,
//! format extraction, legacy conversion, and the PDF pipeline, presenting
//! a consistent API to users.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
