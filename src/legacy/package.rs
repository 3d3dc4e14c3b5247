//! Synthetic word package assembly.
//!
//! Salvaged lines are wrapped into a minimal but spec-valid OOXML word
//! package - `[Content_Types].xml`, `_rels/.rels`, `word/document.xml`,
//! `word/styles.xml` - written as a Store-only archive. This is the only
//! artifact the engine ever writes as a deliverable; it exists so legacy
//! salvage output can flow through the ordinary word extractor.

use crate::common::xml;
use crate::common::Result;
use pulp_zip::ZipWriter;

const CONTENT_TYPES: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">",
    "<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>",
    "<Default Extension=\"xml\" ContentType=\"application/xml\"/>",
    "<Override PartName=\"/word/document.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml\"/>",
    "<Override PartName=\"/word/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml\"/>",
    "</Types>"
);

const PACKAGE_RELS: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">",
    "<Relationship Id=\"rId1\" ",
    "Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" ",
    "Target=\"word/document.xml\"/>",
    "</Relationships>"
);

const STYLES: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
    "<w:styles xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"/>"
);

/// Build a minimal word package holding one paragraph per line.
pub fn build_docx(lines: &[String]) -> Result<Vec<u8>> {
    let mut body = String::new();
    for line in lines {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&xml::escape(line));
        body.push_str("</w:t></w:r></w:p>");
    }
    let document = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let mut writer = ZipWriter::new();
    writer.add("[Content_Types].xml", CONTENT_TYPES.as_bytes())?;
    writer.add("_rels/.rels", PACKAGE_RELS.as_bytes())?;
    writer.add("word/document.xml", document.as_bytes())?;
    writer.add("word/styles.xml", STYLES.as_bytes())?;
    Ok(writer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx;
    use pulp_zip::ZipReader;

    #[test]
    fn writer_reader_extractor_round_trip_preserves_lines() {
        let lines = vec![
            "First salvaged line".to_string(),
            "Second & <final> line".to_string(),
        ];
        let bytes = build_docx(&lines).unwrap();
        let archive = ZipReader::parse(&bytes).unwrap();
        assert_eq!(
            docx::extract(&archive),
            "First salvaged line\n\nSecond & <final> line"
        );
    }

    #[test]
    fn package_carries_all_four_parts_in_order() {
        let bytes = build_docx(&[]).unwrap();
        let archive = ZipReader::parse(&bytes).unwrap();
        assert_eq!(
            archive.names().collect::<Vec<_>>(),
            [
                "[Content_Types].xml",
                "_rels/.rels",
                "word/document.xml",
                "word/styles.xml"
            ]
        );
    }

    #[test]
    fn two_paragraph_package_yields_two_lines_blank_separated() {
        let bytes = build_docx(&["one".to_string(), "two".to_string()]).unwrap();
        let archive = ZipReader::parse(&bytes).unwrap();
        let text = docx::extract(&archive);
        assert_eq!(text, "one\n\ntwo");
        assert_eq!(text.split("\n\n").count(), 2);
    }
}
