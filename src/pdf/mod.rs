//! PDF extraction pipeline.
//!
//! Three text strategies run in priority order: a CLI fast path (only
//! when a page limit is in force, explicit or size-triggered), the
//! embedded structural parser, and finally rasterize-plus-OCR when both
//! produced nothing. Recoverable tool errors at each stage route to the
//! next; an error surfaces only once every stage has failed to produce
//! text. Vision-mode rendering is orthogonal and runs regardless of
//! which text strategy won.

mod embedded;
mod ocr;
mod tools;

use crate::common::error::{Error, Result};
use crate::common::ScratchDir;
use crate::config::ExtractionConfig;
use crate::document::{ExtractedDocument, ExtractorKind, MetaValue, OcrMetadata};
use std::fs;
use std::path::{Path, PathBuf};

/// Extract text, metadata, and optional page images from a PDF.
pub fn extract(path: &Path, config: &ExtractionConfig) -> Result<ExtractedDocument> {
    let size = fs::metadata(path)?.len();
    let (page_limit, auto_limited) = config.effective_page_limit(size);
    if auto_limited {
        log::debug!(
            "{}: {size} bytes triggers an automatic {page_limit}-page limit",
            path.display()
        );
    }

    let mut doc = ExtractedDocument {
        extractor: Some(ExtractorKind::Pdf),
        ..Default::default()
    };
    let mut total_pages = None;
    let mut processed_pages = None;
    let mut last_error: Option<Error> = None;

    // Stage 1: CLI fast path, only worthwhile under a page limit.
    if page_limit > 0 {
        match tools::extract_text(path, page_limit) {
            Ok(text) if !text.is_empty() => doc.text = text,
            Ok(_) => {},
            Err(e) => {
                log::debug!("{}: fast path unusable: {e}", path.display());
                last_error = Some(e);
            },
        }
        if !doc.text.is_empty() {
            match tools::metadata(path, config) {
                Ok(meta) => {
                    if let Some(MetaValue::Number(n)) = meta.get("pages") {
                        let total = *n as usize;
                        total_pages = Some(total);
                        processed_pages = Some(total.min(page_limit));
                    }
                    doc.metadata.extend(meta);
                },
                Err(e) => log::debug!("{}: metadata query failed: {e}", path.display()),
            }
        }
    }

    // Stage 2: embedded structural parser.
    if doc.text.is_empty() {
        match embedded::extract(path, page_limit, config) {
            Ok(parsed) => {
                total_pages = Some(parsed.total_pages);
                processed_pages = Some(parsed.processed_pages);
                doc.metadata.extend(parsed.metadata);
                doc.text = parsed.text;
            },
            Err(e) => {
                log::debug!("{}: embedded parser failed: {e}", path.display());
                last_error = Some(e);
            },
        }
    }

    // Stage 3: OCR, only when no strategy produced text.
    if doc.text.is_empty() {
        match run_ocr(path, page_limit, config) {
            Ok((text, pages)) if !text.is_empty() => {
                doc.text = text;
                doc.ocr = Some(OcrMetadata {
                    pages,
                    languages: config.ocr_languages.clone(),
                });
                if processed_pages.is_none() {
                    processed_pages = Some(pages);
                }
            },
            Ok(_) => {},
            Err(e) => {
                log::debug!("{}: OCR fallback failed: {e}", path.display());
                last_error = Some(e);
            },
        }
    }

    if doc.text.is_empty() {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    apply_page_accounting(&mut doc, page_limit, total_pages, processed_pages);

    if config.vision_mode {
        match render_vision_pages(path, page_limit, processed_pages, config) {
            Ok(pages) => doc.vision_pages = pages,
            Err(e) => log::warn!("{}: vision rendering unavailable: {e}", path.display()),
        }
    }

    Ok(doc)
}

/// Record page truncation on the outgoing document.
///
/// With a known total, the flag is exact: set iff pages were cut off.
/// When the total never became known (metadata tool missing or its
/// output lacked a page count) but text was extracted under a limit,
/// the applied limit is still recorded so the truncation is never
/// silent.
fn apply_page_accounting(
    doc: &mut ExtractedDocument,
    page_limit: usize,
    total_pages: Option<usize>,
    processed_pages: Option<usize>,
) {
    match (total_pages, processed_pages) {
        (Some(total), Some(processed)) => {
            doc.truncated_by_pages = total > processed;
            if doc.truncated_by_pages {
                doc.metadata
                    .insert("page_limit".to_string(), MetaValue::Number(page_limit as i64));
            }
        },
        _ => {
            if page_limit > 0 && !doc.text.is_empty() {
                doc.metadata
                    .insert("page_limit".to_string(), MetaValue::Number(page_limit as i64));
            }
        },
    }
}

fn run_ocr(path: &Path, page_limit: usize, config: &ExtractionConfig) -> Result<(String, usize)> {
    let scratch = ScratchDir::new("pulp-ocr-")?;
    let images = ocr::rasterize(path, page_limit, ocr::OCR_DPI, &scratch)?;
    if images.is_empty() {
        return Ok((String::new(), 0));
    }
    let text = ocr::recognize(&images, &config.ocr_languages)?;
    Ok((text, images.len()))
}

/// Render page images that outlive this call.
///
/// The page count is bounded by the vision limit, any active text page
/// limit, and the processed page count; the directory holding the
/// images is handed to the caller, who must remove it.
fn render_vision_pages(
    path: &Path,
    page_limit: usize,
    processed_pages: Option<usize>,
    config: &ExtractionConfig,
) -> Result<Vec<PathBuf>> {
    let mut bound = config.vision_page_limit;
    if page_limit > 0 {
        bound = bound.min(page_limit);
    }
    if let Some(processed) = processed_pages {
        if processed > 0 {
            bound = bound.min(processed);
        }
    }
    if bound == 0 {
        return Ok(Vec::new());
    }
    let scratch = ScratchDir::new("pulp-vision-")?;
    let images = ocr::rasterize(path, bound, config.vision_dpi, &scratch)?;
    scratch.persist();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_surface_an_error_from_the_final_stage() {
        let _ = env_logger::builder().is_test(true).try_init();
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let path = scratch.join("bogus.pdf");
        fs::write(&path, b"this is not a pdf at all").unwrap();
        // Every stage fails: no stage can pull text out of garbage, so
        // the held error must surface instead of a silent empty result.
        assert!(extract(&path, &ExtractionConfig::default()).is_err());
    }

    #[test]
    fn page_flag_is_exact_when_the_total_is_known() {
        let mut doc = ExtractedDocument {
            text: "body".to_string(),
            ..Default::default()
        };
        apply_page_accounting(&mut doc, 40, Some(100), Some(40));
        assert!(doc.truncated_by_pages);
        assert_eq!(doc.metadata.get("page_limit"), Some(&MetaValue::Number(40)));

        let mut doc = ExtractedDocument {
            text: "body".to_string(),
            ..Default::default()
        };
        apply_page_accounting(&mut doc, 40, Some(5), Some(5));
        assert!(!doc.truncated_by_pages);
        assert!(!doc.metadata.contains_key("page_limit"));
    }

    #[test]
    fn unknown_total_under_a_limit_still_records_the_cap() {
        // Fast-path text with the metadata tool missing: the total page
        // count never becomes known, but the applied limit must not
        // vanish from the record.
        let mut doc = ExtractedDocument {
            text: "fast path text".to_string(),
            ..Default::default()
        };
        apply_page_accounting(&mut doc, 40, None, None);
        assert_eq!(doc.metadata.get("page_limit"), Some(&MetaValue::Number(40)));

        let mut doc = ExtractedDocument {
            text: "unlimited".to_string(),
            ..Default::default()
        };
        apply_page_accounting(&mut doc, 0, None, None);
        assert!(!doc.metadata.contains_key("page_limit"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = extract(
            Path::new("/nonexistent/input.pdf"),
            &ExtractionConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
