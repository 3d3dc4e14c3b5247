//! Embedded parser fallback.
//!
//! When the CLI fast path is skipped or produces nothing, the document
//! is parsed structurally and text is pulled page by page up to the
//! active limit. Metadata comes from the trailer's info dictionary,
//! including the PDF date-string format (`D:YYYYMMDDHHMMSS+HH'MM'`),
//! which is normalized to an RFC 3339 timestamp.

use crate::common::error::Result;
use crate::config::ExtractionConfig;
use crate::document::MetaValue;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use lopdf::{Dictionary, Document, Object};
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome of a structural parse: text plus page accounting.
pub(crate) struct EmbeddedPdf {
    pub text: String,
    pub total_pages: usize,
    pub processed_pages: usize,
    pub metadata: BTreeMap<String, MetaValue>,
}

/// Parse the document and extract embedded text page by page.
///
/// Per-page extraction failures are recovered locally as empty pages;
/// only a failure to parse the document structure itself propagates.
pub(crate) fn extract(
    path: &Path,
    page_limit: usize,
    config: &ExtractionConfig,
) -> Result<EmbeddedPdf> {
    let doc = Document::load(path)?;
    let pages = doc.get_pages();
    let total_pages = pages.len();
    let processed_pages = if page_limit > 0 {
        total_pages.min(page_limit)
    } else {
        total_pages
    };

    let mut chunks = Vec::new();
    for &number in pages.keys().take(processed_pages) {
        match doc.extract_text(&[number]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    chunks.push(text.to_string());
                }
            },
            Err(e) => log::debug!("{}: page {number} has no usable text: {e}", path.display()),
        }
    }

    let mut metadata = info_metadata(&doc, config);
    metadata.insert("pages".to_string(), MetaValue::Number(total_pages as i64));

    Ok(EmbeddedPdf {
        text: chunks.join("\n\n"),
        total_pages,
        processed_pages,
        metadata,
    })
}

fn info_metadata(doc: &Document, config: &ExtractionConfig) -> BTreeMap<String, MetaValue> {
    let mut out = BTreeMap::new();
    let Some(info) = info_dict(doc) else {
        return out;
    };
    let fields: [(&[u8], &str, bool); 5] = [
        (b"Title", "title", false),
        (b"Author", "author", false),
        (b"Subject", "subject", false),
        (b"CreationDate", "created", true),
        (b"ModDate", "modified", true),
    ];
    for (key, name, is_date) in fields {
        let Ok(obj) = info.get(key) else { continue };
        let Some(raw) = string_value(doc, obj) else {
            continue;
        };
        let raw = raw.trim().to_string();
        if raw.is_empty() {
            continue;
        }
        let value = if is_date {
            parse_pdf_date(&raw).unwrap_or(raw)
        } else {
            raw
        };
        out.insert(name.to_string(), MetaValue::Text(config.cap_metadata(&value)));
    }
    out
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    let info = match info {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    info.as_dict().ok()
}

fn string_value(doc: &Document, obj: &Object) -> Option<String> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    match obj {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE when BOM-prefixed, else Latin-ish.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let (text, _) = encoding_rs::UTF_16BE.decode_without_bom_handling(&bytes[2..]);
        text.into_owned()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Parse a `D:YYYYMMDDHHMMSS+HH'MM'` date string to RFC 3339.
///
/// Components after the day are optional and default to zero; a missing
/// or `Z` offset means UTC.
pub(crate) fn parse_pdf_date(raw: &str) -> Option<String> {
    let body = raw.strip_prefix("D:").unwrap_or(raw);
    let digits: String = body
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .take(14)
        .collect();
    if digits.len() < 8 {
        return None;
    }
    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month: u32 = digits.get(4..6)?.parse().ok()?;
    let day: u32 = digits.get(6..8)?.parse().ok()?;
    let hour: u32 = digits.get(8..10).and_then(|s| s.parse().ok()).unwrap_or(0);
    let minute: u32 = digits.get(10..12).and_then(|s| s.parse().ok()).unwrap_or(0);
    let second: u32 = digits.get(12..14).and_then(|s| s.parse().ok()).unwrap_or(0);

    let offset = parse_utc_offset(&body[digits.len()..])?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    let stamp = date.and_time(time).and_local_timezone(offset).single()?;
    Some(stamp.to_rfc3339())
}

fn parse_utc_offset(rest: &str) -> Option<FixedOffset> {
    match rest.chars().next() {
        None | Some('Z') => FixedOffset::east_opt(0),
        Some(sign @ ('+' | '-')) => {
            let rest = &rest[1..];
            let hours: i32 = rest.get(0..2)?.parse().ok()?;
            // Minutes follow an apostrophe: +05'30'
            let minutes: i32 = rest.get(3..5).and_then(|s| s.parse().ok()).unwrap_or(0);
            let seconds = (hours * 3600 + minutes * 60) * if sign == '-' { -1 } else { 1 };
            FixedOffset::east_opt(seconds)
        },
        _ => None,
    }
}
