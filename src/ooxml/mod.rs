//! OOXML (Office Open XML) semantic text extraction.
//!
//! Three independent extractors share the archive container reader but
//! apply format-specific tokenization: word packages walk paragraphs and
//! tables, presentation packages walk slides, and spreadsheet packages
//! resolve cells through the shared-string table.
//!
//! A missing expected part (e.g. no `word/document.xml`) yields empty
//! text rather than an error: some valid documents, such as image-only
//! slides, legitimately have no extractable content.

pub mod docx;
pub mod pptx;
pub mod xlsx;

use crate::common::xml;
use crate::config::ExtractionConfig;
use crate::document::MetaValue;
use pulp_zip::ZipReader;
use std::collections::BTreeMap;

/// Tokenize the text runs of one paragraph-like block.
///
/// Emits `text_tag` character data in document order, with the explicit
/// tab marker becoming `\t` and each break marker becoming `\n`.
pub(crate) fn scan_runs(
    inner: &str,
    text_tag: &str,
    tab_tag: &str,
    break_tags: &[&str],
) -> String {
    fn consider<'a>(
        next: &mut Option<(usize, usize, char, &'a str)>,
        elem: Option<xml::Element<'a>>,
        marker: char,
    ) {
        if let Some(e) = elem {
            let earlier = match *next {
                Some((start, ..)) => e.start < start,
                None => true,
            };
            if earlier {
                *next = Some((e.start, e.end, marker, e.inner));
            }
        }
    }

    let mut out = String::new();
    let mut pos = 0;
    loop {
        // Earliest of: a text run, a tab marker, or any break marker.
        let mut next: Option<(usize, usize, char, &str)> = None;
        consider(&mut next, xml::element_at(inner, pos, text_tag), '\0');
        consider(&mut next, xml::element_at(inner, pos, tab_tag), '\t');
        for br in break_tags {
            consider(&mut next, xml::element_at(inner, pos, br), '\n');
        }

        match next {
            Some((_, end, '\0', text)) => {
                out.push_str(&xml::decode_entities(text));
                pos = end;
            },
            Some((_, end, marker, _)) => {
                out.push(marker);
                pos = end;
            },
            None => return out,
        }
    }
}

/// Skip a leading paragraph-properties block.
///
/// `<w:pPr>` (and `<a:pPr>`) may define tab stops with the same marker
/// element the body uses for literal tabs; property blocks contribute no
/// text and are dropped before run scanning.
pub(crate) fn skip_paragraph_props<'a>(inner: &'a str, props_tag: &str) -> &'a str {
    if let Some(props) = xml::element_at(inner, 0, props_tag) {
        if inner[..props.start].trim().is_empty() {
            return &inner[props.end..];
        }
    }
    inner
}

/// Read document properties from `docProps/core.xml`, when present.
///
/// Values are capped to the configured metadata length; empty fields are
/// dropped.
pub(crate) fn core_properties(
    archive: &ZipReader,
    config: &ExtractionConfig,
) -> BTreeMap<String, MetaValue> {
    let mut metadata = BTreeMap::new();
    let Some(core) = archive.get_str("docProps/core.xml") else {
        return metadata;
    };
    let fields = [
        ("dc:title", "title"),
        ("dc:creator", "author"),
        ("dc:subject", "subject"),
        ("dcterms:created", "created"),
        ("dcterms:modified", "modified"),
    ];
    for (tag, key) in fields {
        if let Some(elem) = xml::first_element(&core, tag) {
            let value = xml::decode_entities(elem.inner.trim());
            if !value.is_empty() {
                metadata.insert(key.to_string(), MetaValue::Text(config.cap_metadata(&value)));
            }
        }
    }
    metadata
}
