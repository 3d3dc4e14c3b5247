//! Rasterization and optical character recognition.
//!
//! Pages are rendered to PNG images by an external rasterizer, then fed
//! one at a time through the OCR engine. The same rasterizer serves
//! vision-mode rendering; only the destination directory's lifetime
//! differs.

use crate::common::error::Result;
use crate::common::{process, ScratchDir};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolution for OCR input. Recognition quality degrades well below
/// this; vision rendering uses its own configured DPI instead.
pub(crate) const OCR_DPI: u32 = 300;

/// Render up to `page_limit` pages (zero = all) into `scratch` as PNGs.
///
/// Returns the image paths in page order.
pub(crate) fn rasterize(
    input: &Path,
    page_limit: usize,
    dpi: u32,
    scratch: &ScratchDir,
) -> Result<Vec<PathBuf>> {
    let mut cmd = Command::new("pdftoppm");
    cmd.args(["-png", "-r"]).arg(dpi.to_string());
    if page_limit > 0 {
        cmd.args(["-f", "1", "-l"]).arg(page_limit.to_string());
    }
    cmd.arg(input).arg(scratch.join("page"));
    process::run("pdftoppm", &mut cmd)?;
    collect_page_images(scratch.path())
}

fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(number) = page_number(name) {
            pages.push((number, path));
        }
    }
    pages.sort();
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Page index from a rasterizer output name like `page-07.png`.
///
/// The rasterizer zero-pads the index to the width of the final page
/// number, so the numeric value is what orders the images.
fn page_number(name: &str) -> Option<usize> {
    name.strip_prefix("page-")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Run the OCR engine over each image, joining pages with a blank line.
pub(crate) fn recognize(images: &[PathBuf], languages: &[String]) -> Result<String> {
    let language = if languages.is_empty() {
        "eng".to_string()
    } else {
        languages.join("+")
    };
    let mut pages = Vec::new();
    for image in images {
        let mut cmd = Command::new("tesseract");
        cmd.arg(image).arg("stdout").args(["-l", &language]);
        let output = process::run("tesseract", &mut cmd)?;
        let text = String::from_utf8_lossy(&output.stdout).replace('\x0c', "");
        let text = text.trim();
        if !text.is_empty() {
            pages.push(text.to_string());
        }
    }
    Ok(pages.join("\n\n"))
}
