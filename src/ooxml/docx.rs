//! Word package text extraction (.docx, .docm, .dotx, .dotm).
//!
//! Collects the main document part plus header/footer/footnote/endnote
//! parts, and walks each one's paragraphs and tables in document order.
//! Table cells are tab-joined, table rows newline-joined, and paragraph
//! blocks joined with a blank line.

use super::{scan_runs, skip_paragraph_props};
use crate::common::xml;
use pulp_zip::ZipReader;

const BREAKS: &[&str] = &["w:br", "w:cr"];

fn paragraph_text(inner: &str) -> String {
    scan_runs(skip_paragraph_props(inner, "w:pPr"), "w:t", "w:tab", BREAKS)
}

/// Extract all text from a word package.
///
/// Returns empty text when no recognized part exists; callers treat that
/// as "no extractable content", not as a failure.
pub fn extract(archive: &ZipReader) -> String {
    let mut blocks = Vec::new();
    for name in part_names(archive) {
        if let Some(part) = archive.get_str(&name) {
            blocks.extend(part_blocks(&part));
        }
    }
    blocks.join("\n\n")
}

/// The parts that contribute text: the document body first, then
/// header/footer/footnote/endnote parts in natural filename order.
fn part_names(archive: &ZipReader) -> Vec<String> {
    let mut names = Vec::new();
    if archive.contains("word/document.xml") {
        names.push("word/document.xml".to_string());
    }
    let mut auxiliary: Vec<String> = archive
        .names()
        .filter(|name| {
            let Some(stem) = name
                .strip_prefix("word/")
                .and_then(|rest| rest.strip_suffix(".xml"))
            else {
                return false;
            };
            !stem.contains('/')
                && ["header", "footer", "footnotes", "endnotes"]
                    .iter()
                    .any(|prefix| stem.starts_with(prefix))
        })
        .map(str::to_string)
        .collect();
    auxiliary.sort_by(|a, b| xml::natural_cmp(a, b));
    names.extend(auxiliary);
    names
}

/// Walk one part, yielding non-empty paragraph and table blocks in order.
fn part_blocks(part: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    loop {
        let paragraph = xml::element_at(part, pos, "w:p");
        let table = xml::element_at(part, pos, "w:tbl");
        // Tables contain paragraphs; whichever starts first owns the span.
        let take_table = match (&paragraph, &table) {
            (Some(p), Some(t)) => t.start < p.start,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (None, None) => break,
        };
        let (text, end) = if take_table {
            let t = table.unwrap();
            (table_text(t.inner), t.end)
        } else {
            let p = paragraph.unwrap();
            (paragraph_text(p.inner), p.end)
        };
        if !text.trim().is_empty() {
            blocks.push(text);
        }
        pos = end;
    }
    blocks
}

/// Render a table: cells tab-joined, rows newline-joined.
fn table_text(inner: &str) -> String {
    let mut lines = Vec::new();
    for row in xml::elements(inner, "w:tr") {
        let cells: Vec<String> = xml::elements(row.inner, "w:tc")
            .iter()
            .map(|cell| cell_text(cell.inner))
            .collect();
        let line = cells.join("\t");
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// A cell's paragraphs, flattened onto one line.
fn cell_text(inner: &str) -> String {
    let paragraphs: Vec<String> = xml::elements(inner, "w:p")
        .iter()
        .map(|p| paragraph_text(p.inner))
        .filter(|text| !text.trim().is_empty())
        .collect();
    paragraphs.join(" ")
}
