//! Per-process warn-once registry for missing external tools.
//!
//! A batch run over a directory may hit the same missing binary hundreds
//! of times; the fallback transition should be observable exactly once
//! per tool per process, not once per file.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;

static WARNED: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Record that `tool` was found missing, logging on the first sighting.
///
/// Returns `true` when this call produced the warning.
pub fn warn_tool_missing(tool: &'static str) -> bool {
    let fresh = WARNED.lock().insert(tool);
    if fresh {
        log::warn!("external tool '{tool}' not found; continuing with fallback strategies");
    }
    fresh
}

/// Check whether a tool has already been reported missing.
pub fn already_warned(tool: &str) -> bool {
    WARNED.lock().contains(tool)
}
