//! Extraction result types.
//!
//! Every extractor produces exactly one [`ExtractedDocument`] per input
//! file; the record is immutable once returned and is what the prompt
//! building layer downstream consumes.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Which extractor produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    /// OOXML word package (.docx and friends)
    Word,
    /// OOXML presentation package
    Presentation,
    /// OOXML spreadsheet package
    Spreadsheet,
    /// OpenDocument package (content.xml)
    OpenDocument,
    /// Keynote XML bundle (index.apxl)
    Keynote,
    /// Legacy binary routed through conversion + the word extractor
    LegacyWord,
    /// Legacy binary salvaged directly to text
    LegacySalvage,
    /// PDF pipeline (CLI / embedded parser / OCR)
    Pdf,
}

/// A metadata value: free text or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Text(String),
    Number(i64),
}

impl MetaValue {
    /// The textual form, when this value is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetaValue::Text(s) => Some(s),
            MetaValue::Number(_) => None,
        }
    }
}

impl std::fmt::Display for MetaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaValue::Text(s) => f.write_str(s),
            MetaValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// OCR accounting attached when the OCR fallback ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrMetadata {
    /// Number of pages that went through the OCR engine.
    pub pages: usize,
    /// Language tags passed to the engine.
    pub languages: Vec<String>,
}

/// The normalized record every extractor returns.
#[derive(Debug, Default)]
pub struct ExtractedDocument {
    /// Extracted plain text.
    pub text: String,
    /// Document properties (title, author, dates, page counts).
    pub metadata: BTreeMap<String, MetaValue>,
    /// True when a page limit cut off processing before the last page.
    pub truncated_by_pages: bool,
    /// True when the character budget cut off the text.
    pub truncated_by_characters: bool,
    /// Which extractor produced this record.
    pub extractor: Option<ExtractorKind>,
    /// Present when the OCR fallback produced the text.
    pub ocr: Option<OcrMetadata>,
    /// Rendered page images when vision mode was enabled. The images
    /// live in a directory the caller now owns and must remove.
    pub vision_pages: Vec<PathBuf>,
}

impl ExtractedDocument {
    /// Build a text-only record for the given extractor.
    pub fn from_text(text: String, extractor: ExtractorKind) -> Self {
        Self {
            text,
            extractor: Some(extractor),
            ..Self::default()
        }
    }

    /// Apply a character budget: prefix-slice the text on a char boundary.
    ///
    /// A budget of zero means unlimited. The truncation is recorded, never
    /// silent.
    pub fn apply_character_budget(&mut self, budget: usize) {
        if budget == 0 || self.text.len() <= budget {
            return;
        }
        let mut cut = budget;
        while !self.text.is_char_boundary(cut) {
            cut -= 1;
        }
        self.text.truncate(cut);
        self.truncated_by_characters = true;
        self.metadata.insert(
            "character_budget".to_string(),
            MetaValue::Number(budget as i64),
        );
    }
}
