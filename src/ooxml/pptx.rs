//! Presentation package text extraction (.pptx, .pptm, .ppsx, .ppsm,
//! .potx, .potm).
//!
//! Selects `ppt/slides/slideN.xml` parts, natural-sorts them so slide 10
//! follows slide 9, and extracts every text run per slide. Slides are
//! joined with a blank line.

use super::{scan_runs, skip_paragraph_props};
use crate::common::xml;
use pulp_zip::ZipReader;

/// Extract all text from a presentation package.
pub fn extract(archive: &ZipReader) -> String {
    let mut slides: Vec<String> = archive
        .names()
        .filter(|name| is_slide_part(name))
        .map(str::to_string)
        .collect();
    slides.sort_by(|a, b| xml::natural_cmp(a, b));

    let mut blocks = Vec::new();
    for name in slides {
        if let Some(part) = archive.get_str(&name) {
            let text = slide_text(&part);
            if !text.trim().is_empty() {
                blocks.push(text);
            }
        }
    }
    blocks.join("\n\n")
}

/// `ppt/slides/slideN.xml` with a purely numeric N.
fn is_slide_part(name: &str) -> bool {
    name.strip_prefix("ppt/slides/slide")
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// One slide: paragraphs newline-joined.
fn slide_text(part: &str) -> String {
    let paragraphs: Vec<String> = xml::elements(part, "a:p")
        .iter()
        .map(|p| scan_runs(skip_paragraph_props(p.inner, "a:pPr"), "a:t", "a:tab", &["a:br"]))
        .filter(|text| !text.trim().is_empty())
        .collect();
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulp_zip::ZipWriter;

    fn package(parts: &[(&str, &str)]) -> ZipReader {
        let mut writer = ZipWriter::new();
        for (name, body) in parts {
            writer.add(name, body.as_bytes()).unwrap();
        }
        ZipReader::parse(&writer.finish()).unwrap()
    }

    fn slide(text_runs: &[&str]) -> String {
        let runs: String = text_runs
            .iter()
            .map(|t| format!("<a:r><a:t>{t}</a:t></a:r>"))
            .collect();
        format!("<p:sld><p:txBody><a:p>{runs}</a:p></p:txBody></p:sld>")
    }

    #[test]
    fn slides_sort_numerically_not_lexically() {
        let archive = package(&[
            ("ppt/slides/slide10.xml", &slide(&["ten"])),
            ("ppt/slides/slide2.xml", &slide(&["two"])),
            ("ppt/slides/slide1.xml", &slide(&["one"])),
        ]);
        assert_eq!(extract(&archive), "one\n\ntwo\n\nten");
    }

    #[test]
    fn non_slide_parts_are_ignored() {
        let archive = package(&[
            ("ppt/slides/slide1.xml", &slide(&["keep"])),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
            ("ppt/slideMasters/slideMaster1.xml", &slide(&["skip"])),
            ("ppt/notesSlides/notesSlide1.xml", &slide(&["skip"])),
        ]);
        assert_eq!(extract(&archive), "keep");
    }

    #[test]
    fn breaks_and_tabs_become_literals() {
        let body = "<p:sld><p:txBody><a:p>\
            <a:r><a:t>line1</a:t></a:r><a:br/>\
            <a:r><a:t>line2</a:t></a:r><a:tab/><a:r><a:t>col</a:t></a:r>\
            </a:p></p:txBody></p:sld>";
        let archive = package(&[("ppt/slides/slide1.xml", body)]);
        assert_eq!(extract(&archive), "line1\nline2\tcol");
    }

    #[test]
    fn image_only_slides_yield_empty_text() {
        let body = "<p:sld><p:cSld><p:spTree/></p:cSld></p:sld>";
        let archive = package(&[("ppt/slides/slide1.xml", body)]);
        assert_eq!(extract(&archive), "");
    }
}
