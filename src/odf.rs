//! OpenDocument package text extraction (.odt, .ods, .odp).
//!
//! Single-part extraction: read `content.xml`, substitute the explicit
//! line-break and tab markers, let paragraph and row boundaries imply
//! newlines, strip the remaining markup, then collapse whitespace per
//! line and drop empty lines. No shared-string indirection or multi-part
//! aggregation exists in these formats.

use crate::common::xml;
use pulp_zip::ZipReader;

/// Extract all text from an OpenDocument package.
pub fn extract(archive: &ZipReader) -> String {
    match archive.get_str("content.xml") {
        Some(content) => flatten_markup(&content),
        None => String::new(),
    }
}

/// Strip markup to lines of text.
///
/// Shared with the Keynote extractor, whose XML bundle flattens the same
/// way: explicit markers become literal whitespace, closing block tags
/// imply newlines, everything else is dropped.
pub(crate) fn flatten_markup(content: &str) -> String {
    let raw = xml::strip_tags_with(content, |tag, out| {
        let name = xml::tag_name(tag);
        if tag.starts_with('/') {
            // Paragraph, heading, and row boundaries imply newlines; the
            // sf-prefixed forms are the Keynote bundle's equivalents.
            if matches!(name, "text:p" | "text:h" | "table:table-row" | "sf:p") {
                out.push('\n');
            }
            return;
        }
        match name {
            "text:line-break" | "sf:br" => out.push('\n'),
            "text:tab" | "sf:tab" => out.push('\t'),
            // A cell boundary separates values on the same row.
            "table:table-cell" => out.push('\t'),
            _ => {},
        }
    });

    // Collapse space runs per tab-separated field so the literal tabs
    // substituted above survive.
    let lines: Vec<String> = raw
        .lines()
        .map(|line| {
            line.trim()
                .split('\t')
                .map(|field| field.split_whitespace().collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .filter(|line| !line.trim().is_empty())
        .collect();
    lines.join("\n")
}
