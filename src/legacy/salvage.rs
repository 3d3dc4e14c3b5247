//! Heuristic text salvage from undocumented binary formats.
//!
//! Legacy Office binaries mix encodings unpredictably across internal
//! structures, so the buffer is scanned three times - as single-byte
//! Latin text, as little-endian UTF-16, and as UTF-8 - and runs of at
//! least four printable characters are collected from each pass. The
//! wide pass additionally requires runs to be mostly Latin, since a
//! wide decode of single-byte text produces printable CJK-range
//! garbage. Lines identical across interpretations are deduplicated,
//! preserving first-seen order.

use std::collections::HashSet;

/// Minimum printable run length worth keeping.
const MIN_RUN_CHARS: usize = 4;

/// Scan a raw byte buffer for salvageable lines of text.
pub fn scan(bytes: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut seen = HashSet::new();

    // Pass 1: single-byte Latin interpretation.
    collect_runs(
        bytes.iter().map(|&b| match b {
            0x20..=0x7E => Some(b as char),
            0xA0..=0xFF => Some(char::from(b)),
            _ => None,
        }),
        &mut lines,
        &mut seen,
        any_run,
    );

    // Pass 2: little-endian UTF-16, constrained to mostly-Latin runs.
    let (utf16, _) = encoding_rs::UTF_16LE.decode_without_bom_handling(bytes);
    collect_runs(utf16.chars().map(printable), &mut lines, &mut seen, mostly_latin);

    // Pass 3: UTF-8.
    let utf8 = String::from_utf8_lossy(bytes);
    collect_runs(utf8.chars().map(printable), &mut lines, &mut seen, any_run);

    lines
}

/// A printable char, or `None` when the char terminates a run.
fn printable(c: char) -> Option<char> {
    if c == '\u{FFFD}' || c.is_control() {
        None
    } else {
        Some(c)
    }
}

fn any_run(_: &str) -> bool {
    true
}

/// Single-byte text read as UTF-16 pairs up into printable CJK-range
/// code points; a genuine wide-text run in these documents is mostly
/// Latin. Require at least half the characters below U+0100.
fn mostly_latin(run: &str) -> bool {
    let mut total = 0usize;
    let mut latin = 0usize;
    for c in run.chars() {
        total += 1;
        if (c as u32) < 0x100 {
            latin += 1;
        }
    }
    latin * 2 >= total
}

/// Collect printable runs from one interpretation pass.
///
/// `None` items separate runs; runs shorter than [`MIN_RUN_CHARS`] after
/// trimming or rejected by the pass's `keep` filter are discarded, and
/// duplicates across passes are dropped.
fn collect_runs(
    chars: impl Iterator<Item = Option<char>>,
    lines: &mut Vec<String>,
    seen: &mut HashSet<String>,
    keep: fn(&str) -> bool,
) {
    let mut run = String::new();
    let mut flush = |run: &mut String| {
        let trimmed = run.trim();
        if trimmed.chars().count() >= MIN_RUN_CHARS
            && keep(trimmed)
            && seen.insert(trimmed.to_string())
        {
            lines.push(trimmed.to_string());
        }
        run.clear();
    };
    for item in chars {
        match item {
            Some(c) => run.push(c),
            None => flush(&mut run),
        }
    }
    flush(&mut run);
}
