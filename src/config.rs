//! Extraction configuration.

/// Recognized extraction options.
///
/// The defaults carry the empirically tuned constants: files over 20 MB
/// trigger an automatic page limit, text is budgeted to 20,000 characters,
/// and metadata values are capped at 256 characters. All of them are
/// configuration, not fixed behavior.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Maximum pages to read from a PDF. Zero means unlimited.
    pub page_limit: usize,
    /// File size above which a page limit is imposed automatically.
    pub large_file_threshold_bytes: u64,
    /// The page limit applied when the size threshold trips.
    pub large_file_page_limit: usize,
    /// Maximum characters of extracted text. Zero means unlimited.
    pub character_budget: usize,
    /// Render page images alongside text.
    pub vision_mode: bool,
    /// Upper bound on rendered pages in vision mode.
    pub vision_page_limit: usize,
    /// Rendering resolution for vision mode.
    pub vision_dpi: u32,
    /// Language tags handed to the OCR engine.
    pub ocr_languages: Vec<String>,
    /// Longest metadata value kept before truncation.
    pub metadata_value_cap: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            page_limit: 0,
            large_file_threshold_bytes: 20 * 1024 * 1024,
            large_file_page_limit: 40,
            character_budget: 20_000,
            vision_mode: false,
            vision_page_limit: 8,
            vision_dpi: 150,
            ocr_languages: vec!["eng".to_string()],
            metadata_value_cap: 256,
        }
    }
}

impl ExtractionConfig {
    /// The page limit in force for a file of `size` bytes.
    ///
    /// Returns the limit plus whether it was auto-imposed by file size
    /// rather than requested explicitly. Zero means unlimited.
    pub fn effective_page_limit(&self, size: u64) -> (usize, bool) {
        if self.page_limit > 0 {
            (self.page_limit, false)
        } else if size > self.large_file_threshold_bytes && self.large_file_page_limit > 0 {
            (self.large_file_page_limit, true)
        } else {
            (0, false)
        }
    }

    /// Truncate a metadata value to the configured cap.
    pub fn cap_metadata(&self, value: &str) -> String {
        if self.metadata_value_cap == 0 || value.len() <= self.metadata_value_cap {
            return value.to_string();
        }
        let mut cut = self.metadata_value_cap;
        while !value.is_char_boundary(cut) {
            cut -= 1;
        }
        value[..cut].to_string()
    }
}
