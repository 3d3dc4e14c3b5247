//! Keynote bundle text extraction (.key).
//!
//! Pre-iWork'13 Keynote documents are ZIP bundles carrying a single XML
//! index (`index.apxl`, sometimes capitalized). The text pipeline is the
//! same tag-flattening pass the OpenDocument extractor uses; there is no
//! multi-part aggregation.

use crate::odf::flatten_markup;
use pulp_zip::ZipReader;

/// Names the index part has been observed under.
const INDEX_PARTS: &[&str] = &["index.apxl", "Index.apxl"];

/// Extract all text from a Keynote bundle.
///
/// Missing index parts yield empty text; newer Keynote bundles store
/// their content in binary archives this extractor does not read.
pub fn extract(archive: &ZipReader) -> String {
    for name in INDEX_PARTS {
        if let Some(content) = archive.get_str(name) {
            return flatten_markup(&content);
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulp_zip::ZipWriter;

    #[test]
    fn reads_index_apxl_text() {
        let apxl = "<key:presentation><key:slide>\
            <sf:text-body><sf:p>Opening slide</sf:p><sf:p>Second line</sf:p></sf:text-body>\
            </key:slide></key:presentation>";
        let mut writer = ZipWriter::new();
        writer.add("index.apxl", apxl.as_bytes()).unwrap();
        let archive = ZipReader::parse(&writer.finish()).unwrap();
        assert_eq!(extract(&archive), "Opening slide\nSecond line");
    }

    #[test]
    fn capitalized_index_part_is_accepted() {
        let mut writer = ZipWriter::new();
        writer.add("Index.apxl", b"<key:presentation><sf:p>Title</sf:p></key:presentation>").unwrap();
        let archive = ZipReader::parse(&writer.finish()).unwrap();
        assert_eq!(extract(&archive), "Title");
    }

    #[test]
    fn missing_index_yields_empty_text() {
        let mut writer = ZipWriter::new();
        writer.add("preview.jpg", &[0xFF, 0xD8]).unwrap();
        let archive = ZipReader::parse(&writer.finish()).unwrap();
        assert_eq!(extract(&archive), "");
    }
}
