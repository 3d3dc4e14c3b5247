//! Lightweight XML scanning helpers.
//!
//! The package-format extractors never need schema-aware parsing; they
//! locate a handful of known elements and pull character data out of them.
//! These helpers scan with `memchr::memmem` over the raw part text, the
//! same way the spreadsheet shared-string and slide scanners work,
//! avoiding a full XML parse per part.

use memchr::{memchr, memmem};
use std::cmp::Ordering;

/// One matched element: its attribute text, inner content, and span.
///
/// Self-closing elements yield an empty inner slice. `start` and `end`
/// are byte offsets of the whole element within the scanned content.
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    pub attrs: &'a str,
    pub inner: &'a str,
    pub start: usize,
    pub end: usize,
}

struct OpenTag {
    /// Offset of the leading `<`.
    start: usize,
    /// Offset just past the closing `>`.
    content_start: usize,
    /// Attribute text between the tag name and the `>`.
    attrs_start: usize,
    attrs_end: usize,
    self_closing: bool,
}

/// Find the next `<tag ...>` whose name is exactly `tag`.
///
/// A prefix match alone is not enough: searching for `w:p` must not stop
/// at `<w:pPr>`, so the byte after the name has to terminate it.
fn find_open(content: &str, from: usize, tag: &str) -> Option<OpenTag> {
    let bytes = content.as_bytes();
    let mut pos = from;
    loop {
        let hit = memmem::find(&bytes[pos..], format!("<{tag}").as_bytes())? + pos;
        let after_name = hit + 1 + tag.len();
        match bytes.get(after_name) {
            Some(b' ') | Some(b'>') | Some(b'/') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {},
            _ => {
                pos = after_name;
                continue;
            },
        }
        let gt = memchr(b'>', &bytes[after_name..])? + after_name;
        let self_closing = bytes[..gt].ends_with(b"/");
        let attrs_end = if self_closing { gt - 1 } else { gt };
        return Some(OpenTag {
            start: hit,
            content_start: gt + 1,
            attrs_start: after_name,
            attrs_end,
            self_closing,
        });
    }
}

/// Collect every `<tag>` element at any depth, in document order.
///
/// Same-name nesting is handled by depth counting, so a table inside a
/// table cell resolves to the outermost block. Overlapping matches are
/// consumed: elements inside a returned block are not reported again.
pub fn elements<'a>(content: &'a str, tag: &str) -> Vec<Element<'a>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(elem) = element_at(content, pos, tag) {
        pos = elem.end;
        out.push(elem);
    }
    out
}

/// Find the first `<tag>` element starting at or after `from`.
pub fn element_at<'a>(content: &'a str, from: usize, tag: &str) -> Option<Element<'a>> {
    let open = find_open(content, from, tag)?;
    let attrs = content[open.attrs_start..open.attrs_end].trim();
    if open.self_closing {
        return Some(Element {
            attrs,
            inner: "",
            start: open.start,
            end: open.content_start,
        });
    }

    let close_pat = format!("</{tag}>");
    let mut depth = 1usize;
    let mut scan = open.content_start;
    loop {
        let close = memmem::find(&content.as_bytes()[scan..], close_pat.as_bytes())? + scan;
        // Count same-name opens between the last scan point and this close.
        let mut inner_pos = scan;
        while let Some(nested) = find_open(content, inner_pos, tag) {
            if nested.start >= close {
                break;
            }
            if !nested.self_closing {
                depth += 1;
            }
            inner_pos = nested.content_start;
        }
        depth -= 1;
        if depth == 0 {
            return Some(Element {
                attrs,
                inner: &content[open.content_start..close],
                start: open.start,
                end: close + close_pat.len(),
            });
        }
        scan = close + close_pat.len();
    }
}

/// Find the first `<tag>` element in `content`.
pub fn first_element<'a>(content: &'a str, tag: &str) -> Option<Element<'a>> {
    element_at(content, 0, tag)
}

/// Pull one attribute value out of an element's attribute text.
///
/// Handles both quote styles; no entity decoding is applied here.
pub fn attr_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let bytes = attrs.as_bytes();
    let mut pos = 0;
    loop {
        let hit = memmem::find(&bytes[pos..], name.as_bytes())? + pos;
        let boundary_ok = hit == 0 || matches!(bytes[hit - 1], b' ' | b'\t' | b'\r' | b'\n');
        let mut after = hit + name.len();
        while matches!(bytes.get(after), Some(b' ') | Some(b'\t')) {
            after += 1;
        }
        if !boundary_ok || bytes.get(after) != Some(&b'=') {
            pos = hit + name.len();
            continue;
        }
        after += 1;
        while matches!(bytes.get(after), Some(b' ') | Some(b'\t')) {
            after += 1;
        }
        let quote = match bytes.get(after) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => {
                pos = after;
                continue;
            },
        };
        let value_start = after + 1;
        let end = memchr(quote, &bytes[value_start..])? + value_start;
        return Some(&attrs[value_start..end]);
    }
}

/// Decode the XML entities that occur in Office character data.
///
/// Named entities (`&amp; &lt; &gt; &quot; &apos;`) plus decimal and
/// hexadecimal character references.
pub fn decode_entities(text: &str) -> String {
    if memchr(b'&', text.as_bytes()).is_none() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';') {
            // Entity bodies are short; anything longer is literal text.
            Some(semi) if semi <= 10 => {
                let body = &tail[1..semi];
                match body {
                    "amp" => out.push('&'),
                    "lt" => out.push('<'),
                    "gt" => out.push('>'),
                    "quot" => out.push('"'),
                    "apos" => out.push('\''),
                    _ => {
                        let decoded = body
                            .strip_prefix("#x")
                            .or_else(|| body.strip_prefix("#X"))
                            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                            .or_else(|| body.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                            .and_then(char::from_u32);
                        match decoded {
                            Some(c) => out.push(c),
                            None => out.push_str(&tail[..semi + 1]),
                        }
                    },
                }
                rest = &tail[semi + 1..];
            },
            _ => {
                out.push('&');
                rest = &tail[1..];
            },
        }
    }
    out.push_str(rest);
    out
}

/// Escape text for embedding in XML character data or attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Strip all markup, invoking `on_tag` for each tag body encountered.
///
/// The callback receives the raw tag body (e.g. `text:tab/` or `/text:p`)
/// and may push replacement characters into the output. Character data is
/// entity-decoded as it is copied.
pub fn strip_tags_with(xml: &str, mut on_tag: impl FnMut(&str, &mut String)) -> String {
    let bytes = xml.as_bytes();
    let mut out = String::with_capacity(xml.len() / 4);
    let mut pos = 0;
    while let Some(lt) = memchr(b'<', &bytes[pos..]).map(|i| i + pos) {
        if lt > pos {
            out.push_str(&decode_entities(&xml[pos..lt]));
        }
        match memchr(b'>', &bytes[lt..]).map(|i| i + lt) {
            Some(gt) => {
                on_tag(&xml[lt + 1..gt], &mut out);
                pos = gt + 1;
            },
            None => return out, // dangling '<' at end of part
        }
    }
    out.push_str(&decode_entities(&xml[pos..]));
    out
}

/// The element name of a raw tag body, without the closing-tag slash.
pub fn tag_name(tag_body: &str) -> &str {
    let body = tag_body.trim_start_matches('/');
    body.split([' ', '/', '\t', '\r', '\n']).next().unwrap_or(body)
}

/// Compare file names so embedded numbers sort numerically.
///
/// `slide10.xml` sorts after `slide9.xml` and before `slide11.xml`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut ab, mut bb) = (a.as_bytes(), b.as_bytes());
    loop {
        match (ab.first(), bb.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(&x), Some(&y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let (an, arest) = take_number(ab);
                    let (bn, brest) = take_number(bb);
                    match an.cmp(&bn) {
                        Ordering::Equal => {
                            ab = arest;
                            bb = brest;
                        },
                        other => return other,
                    }
                } else {
                    match x.cmp(&y) {
                        Ordering::Equal => {
                            ab = &ab[1..];
                            bb = &bb[1..];
                        },
                        other => return other,
                    }
                }
            },
        }
    }
}

fn take_number(bytes: &[u8]) -> (u128, &[u8]) {
    let mut value: u128 = 0;
    let mut idx = 0;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        value = value.saturating_mul(10).saturating_add((bytes[idx] - b'0') as u128);
        idx += 1;
    }
    (value, &bytes[idx..])
}
