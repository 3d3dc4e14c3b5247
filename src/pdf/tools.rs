//! CLI collaborators for the fast extraction path.
//!
//! `pdftotext` pulls embedded text without loading the document into
//! memory and `pdfinfo` answers the metadata questions (page count,
//! title, author, dates) as a `Key: value` text block. Both are
//! optional: a missing binary routes the pipeline to the embedded
//! parser instead.

use crate::common::error::Result;
use crate::common::process;
use crate::config::ExtractionConfig;
use crate::document::MetaValue;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// Extract embedded text for the first `page_limit` pages.
pub(crate) fn extract_text(input: &Path, page_limit: usize) -> Result<String> {
    let mut cmd = Command::new("pdftotext");
    if page_limit > 0 {
        cmd.args(["-f", "1", "-l"]).arg(page_limit.to_string());
    }
    cmd.arg(input).arg("-");
    let output = process::run("pdftotext", &mut cmd)?;
    // Form feeds separate pages in the tool's output.
    let text = String::from_utf8_lossy(&output.stdout).replace('\x0c', "\n");
    Ok(text.trim().to_string())
}

/// Query document metadata as a key/value map.
pub(crate) fn metadata(
    input: &Path,
    config: &ExtractionConfig,
) -> Result<BTreeMap<String, MetaValue>> {
    let output = process::run("pdfinfo", Command::new("pdfinfo").arg(input))?;
    let block = String::from_utf8_lossy(&output.stdout);
    Ok(parse_info_block(&block, config))
}

/// Parse the `Key: value` block the metadata tool emits.
fn parse_info_block(block: &str, config: &ExtractionConfig) -> BTreeMap<String, MetaValue> {
    let mut out = BTreeMap::new();
    for line in block.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.trim() {
            "Pages" => {
                if let Ok(n) = value.parse::<i64>() {
                    out.insert("pages".to_string(), MetaValue::Number(n));
                }
            },
            "Title" => {
                out.insert(
                    "title".to_string(),
                    MetaValue::Text(config.cap_metadata(value)),
                );
            },
            "Author" => {
                out.insert(
                    "author".to_string(),
                    MetaValue::Text(config.cap_metadata(value)),
                );
            },
            "Subject" => {
                out.insert(
                    "subject".to_string(),
                    MetaValue::Text(config.cap_metadata(value)),
                );
            },
            "CreationDate" => {
                out.insert(
                    "created".to_string(),
                    MetaValue::Text(config.cap_metadata(value)),
                );
            },
            "ModDate" => {
                out.insert(
                    "modified".to_string(),
                    MetaValue::Text(config.cap_metadata(value)),
                );
            },
            _ => {},
        }
    }
    out
}
