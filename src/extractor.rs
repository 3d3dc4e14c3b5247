//! Format detection and extractor dispatch.
//!
//! The file extension alone selects the extractor; content sniffing is
//! deliberately avoided since the caller already categorizes files by
//! name. Every path through here ends in one [`ExtractedDocument`] with
//! the character budget applied, or an error for formats no extractor
//! claims.

use crate::common::error::{Error, Result};
use crate::config::ExtractionConfig;
use crate::document::{ExtractedDocument, ExtractorKind};
use crate::{iwork, legacy, odf, ooxml, pdf};
use pulp_zip::ZipReader;
use std::fs;
use std::path::Path;

/// What kind of container a file extension maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// OOXML word package
    Word,
    /// OOXML presentation package
    Presentation,
    /// OOXML spreadsheet package
    Spreadsheet,
    /// OpenDocument package
    OpenDocument,
    /// Keynote bundle
    Keynote,
    /// Legacy word binary, converted before extraction
    LegacyWord,
    /// Other legacy binary, salvaged directly
    LegacySalvage,
    /// PDF document
    Pdf,
}

impl FileCategory {
    /// Map a file path to a category by its extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let category = match ext.as_str() {
            "docx" | "docm" | "dotx" | "dotm" => Self::Word,
            "pptx" | "pptm" | "ppsx" | "ppsm" | "potx" | "potm" => Self::Presentation,
            "xlsx" | "xlsm" | "xlsb" | "xltx" | "xltm" => Self::Spreadsheet,
            "odt" | "ods" | "odp" => Self::OpenDocument,
            "key" => Self::Keynote,
            "doc" | "dot" => Self::LegacyWord,
            "ppt" | "pps" | "pot" | "xls" | "xlt" => Self::LegacySalvage,
            "pdf" => Self::Pdf,
            _ => return None,
        };
        Some(category)
    }
}

/// Extract text and metadata from a document file.
///
/// The returned record always has the character budget applied. Empty
/// text is a valid outcome (image-only slides, empty sheets); only
/// structurally unreadable inputs and unknown extensions error.
pub fn extract_file(path: &Path, config: &ExtractionConfig) -> Result<ExtractedDocument> {
    let category = FileCategory::from_path(path).ok_or_else(|| {
        Error::UnsupportedFormat(path.display().to_string())
    })?;

    let mut doc = match category {
        FileCategory::Word => {
            let archive = load_archive(path)?;
            let mut doc =
                ExtractedDocument::from_text(ooxml::docx::extract(&archive), ExtractorKind::Word);
            doc.metadata = ooxml::core_properties(&archive, config);
            doc
        },
        FileCategory::Presentation => {
            let archive = load_archive(path)?;
            let mut doc = ExtractedDocument::from_text(
                ooxml::pptx::extract(&archive),
                ExtractorKind::Presentation,
            );
            doc.metadata = ooxml::core_properties(&archive, config);
            doc
        },
        FileCategory::Spreadsheet => {
            let archive = load_archive(path)?;
            let mut doc = ExtractedDocument::from_text(
                ooxml::xlsx::extract(&archive),
                ExtractorKind::Spreadsheet,
            );
            doc.metadata = ooxml::core_properties(&archive, config);
            doc
        },
        FileCategory::OpenDocument => {
            let archive = load_archive(path)?;
            ExtractedDocument::from_text(odf::extract(&archive), ExtractorKind::OpenDocument)
        },
        FileCategory::Keynote => {
            let archive = load_archive(path)?;
            ExtractedDocument::from_text(iwork::extract(&archive), ExtractorKind::Keynote)
        },
        FileCategory::LegacyWord => extract_converted(path, ExtractorKind::LegacyWord)?,
        FileCategory::LegacySalvage => {
            extract_converted(path, ExtractorKind::LegacySalvage)?
        },
        FileCategory::Pdf => pdf::extract(path, config)?,
    };

    doc.apply_character_budget(config.character_budget);
    Ok(doc)
}

/// Convert a legacy binary, then run the ordinary word extractor on the
/// temporary package. Zero salvaged lines surface as
/// `NoExtractableContent` from the orchestrator. The scratch directory
/// holding the package is released when the conversion guard drops,
/// error paths included.
fn extract_converted(path: &Path, kind: ExtractorKind) -> Result<ExtractedDocument> {
    let conversion = legacy::convert_to_docx(path)?;
    let bytes = fs::read(conversion.docx_path())?;
    let archive = ZipReader::parse(&bytes)?;
    Ok(ExtractedDocument::from_text(
        ooxml::docx::extract(&archive),
        kind,
    ))
}

fn load_archive(path: &Path) -> Result<ZipReader> {
    let bytes = fs::read(path)?;
    Ok(ZipReader::parse(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ScratchDir;
    use crate::document::MetaValue;
    use crate::legacy::package;

    #[test]
    fn extensions_map_case_insensitively() {
        assert_eq!(
            FileCategory::from_path(Path::new("a/Report.DOCX")),
            Some(FileCategory::Word)
        );
        assert_eq!(
            FileCategory::from_path(Path::new("deck.PpTx")),
            Some(FileCategory::Presentation)
        );
        assert_eq!(
            FileCategory::from_path(Path::new("old.XLS")),
            Some(FileCategory::LegacySalvage)
        );
        assert_eq!(FileCategory::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileCategory::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn unknown_extension_is_an_unsupported_format_error() {
        let err = extract_file(Path::new("input.xyz"), &ExtractionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn word_package_extracts_end_to_end() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let path = scratch.join("two_paragraphs.docx");
        let lines = vec!["First paragraph".to_string(), "Second paragraph".to_string()];
        fs::write(&path, package::build_docx(&lines).unwrap()).unwrap();

        let doc = extract_file(&path, &ExtractionConfig::default()).unwrap();
        assert_eq!(doc.text, "First paragraph\n\nSecond paragraph");
        assert_eq!(doc.extractor, Some(ExtractorKind::Word));
        assert!(!doc.truncated_by_characters);
    }

    #[test]
    fn character_budget_applies_at_dispatch() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let path = scratch.join("long.docx");
        let lines = vec!["x".repeat(100)];
        fs::write(&path, package::build_docx(&lines).unwrap()).unwrap();

        let config = ExtractionConfig {
            character_budget: 10,
            ..Default::default()
        };
        let doc = extract_file(&path, &config).unwrap();
        assert_eq!(doc.text.len(), 10);
        assert!(doc.truncated_by_characters);
        assert_eq!(
            doc.metadata.get("character_budget"),
            Some(&MetaValue::Number(10))
        );
    }

    #[test]
    fn legacy_binary_salvages_to_text() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let path = scratch.join("ancient.xls");
        let mut bytes = vec![0x00, 0x01];
        bytes.extend_from_slice(b"Budget figures");
        bytes.push(0x00);
        fs::write(&path, &bytes).unwrap();

        let doc = extract_file(&path, &ExtractionConfig::default()).unwrap();
        assert_eq!(doc.text, "Budget figures");
        assert_eq!(doc.extractor, Some(ExtractorKind::LegacySalvage));
    }

    #[test]
    fn legacy_sheet_lines_join_with_blank_line() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let path = scratch.join("ledger.xls");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"Alpha section");
        bytes.extend_from_slice(&[0x00, 0x01]);
        bytes.extend_from_slice(b"Beta section");
        fs::write(&path, &bytes).unwrap();

        let doc = extract_file(&path, &ExtractionConfig::default()).unwrap();
        assert_eq!(doc.text, "Alpha section\n\nBeta section");
    }

    #[test]
    fn legacy_binary_with_no_text_errors() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let path = scratch.join("noise.xls");
        fs::write(&path, [0x00u8, 0x01, 0x02, 0x03, 0x7F]).unwrap();

        let err = extract_file(&path, &ExtractionConfig::default()).unwrap_err();
        match err {
            Error::NoExtractableContent(source) => assert_eq!(source, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_archive_propagates() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let path = scratch.join("broken.docx");
        fs::write(&path, b"not a zip archive").unwrap();
        let err = extract_file(&path, &ExtractionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedArchive(_)));
    }
}
