//! Legacy-to-modern conversion orchestration.
//!
//! `.doc`/`.dot` inputs are converted to a temporary word package before
//! text extraction so legacy and modern inputs share one extractor. The
//! orchestrator tries each [`ConvertStrategy`] in order and keeps the
//! first usable output; recoverable tool errors (missing binary, bad
//! exit) fall through to the next strategy. The last strategy is
//! heuristic salvage, which always runs locally, so the chain only fails
//! when the input yields no text at all.

use crate::common::error::{Error, Result};
use crate::common::{process, ScratchDir};
use crate::legacy::{package, salvage};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the external converter binary.
const CONVERTER: &str = "soffice";

/// A converted document plus the scratch directory that owns it.
///
/// The temporary package lives inside the scratch directory and is
/// removed when this value drops, on every exit path.
#[derive(Debug)]
pub struct Conversion {
    docx_path: PathBuf,
    #[allow(dead_code)]
    scratch: ScratchDir,
}

impl Conversion {
    /// Path of the converted word package.
    #[inline]
    pub fn docx_path(&self) -> &Path {
        &self.docx_path
    }
}

/// One way of turning a legacy binary into a word package.
pub trait ConvertStrategy {
    /// Human-readable strategy name, for logging.
    fn name(&self) -> &'static str;

    /// Attempt the conversion, writing the output into `scratch`.
    fn attempt(&self, input: &Path, scratch: &ScratchDir) -> Result<PathBuf>;
}

/// External command-line converter.
///
/// The converter's argument interface is not contractually fixed across
/// versions, so several plausible signatures are tried in turn.
pub struct CliConverter;

impl CliConverter {
    fn expected_output(input: &Path, scratch: &ScratchDir) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "converted".to_string());
        scratch.join(&format!("{stem}.docx"))
    }

    /// Check that a converter run actually produced a usable file.
    fn verify(out: &Path) -> Result<PathBuf> {
        match fs::metadata(out) {
            Ok(meta) if meta.len() > 0 => Ok(out.to_path_buf()),
            _ => Err(Error::ExternalToolFailed {
                tool: CONVERTER,
                reason: "converter exited cleanly but produced no output".to_string(),
            }),
        }
    }
}

impl ConvertStrategy for CliConverter {
    fn name(&self) -> &'static str {
        "external converter"
    }

    fn attempt(&self, input: &Path, scratch: &ScratchDir) -> Result<PathBuf> {
        let out = Self::expected_output(input, scratch);

        // Signature 1: --headless --convert-to docx --outdir <dir> <in>
        let mut cmd = Command::new(CONVERTER);
        cmd.arg("--headless")
            .args(["--convert-to", "docx", "--outdir"])
            .arg(scratch.path())
            .arg(input);
        match process::run(CONVERTER, &mut cmd) {
            Ok(_) => return Self::verify(&out),
            // Missing binary will be missing for every signature.
            Err(e @ Error::ExternalToolUnavailable(_)) => return Err(e),
            Err(e) => log::debug!("converter signature 1 failed: {e}"),
        }

        // Signature 2: <in> <out>
        let mut cmd = Command::new(CONVERTER);
        cmd.arg(input).arg(&out);
        match process::run(CONVERTER, &mut cmd) {
            Ok(_) => return Self::verify(&out),
            Err(e @ Error::ExternalToolUnavailable(_)) => return Err(e),
            Err(e) => log::debug!("converter signature 2 failed: {e}"),
        }

        // Signature 3: -o <out> <in>
        let mut cmd = Command::new(CONVERTER);
        cmd.arg("-o").arg(&out).arg(input);
        process::run(CONVERTER, &mut cmd)?;
        Self::verify(&out)
    }
}

/// Heuristic salvage fallback.
///
/// Always available: scans the raw bytes for printable runs and wraps
/// them in a minimal synthetic word package.
pub struct SalvageConverter;

impl ConvertStrategy for SalvageConverter {
    fn name(&self) -> &'static str {
        "binary salvage"
    }

    fn attempt(&self, input: &Path, scratch: &ScratchDir) -> Result<PathBuf> {
        let bytes = fs::read(input)?;
        let lines = salvage::scan(&bytes);
        if lines.is_empty() {
            return Err(Error::NoExtractableContent(input.to_path_buf()));
        }
        let docx = package::build_docx(&lines)?;
        let out = scratch.join("salvaged.docx");
        fs::write(&out, docx)?;
        Ok(out)
    }
}

/// Convert a legacy binary into a temporary word package.
///
/// Strategies run in order; recoverable tool errors fall through to the
/// next one. The returned [`Conversion`] owns the scratch directory
/// holding the output.
pub fn convert_to_docx(input: &Path) -> Result<Conversion> {
    let strategies: [&dyn ConvertStrategy; 2] = [&CliConverter, &SalvageConverter];
    convert_with(input, &strategies)
}

fn convert_with(input: &Path, strategies: &[&dyn ConvertStrategy]) -> Result<Conversion> {
    let scratch = ScratchDir::new("pulp-convert-")?;
    let mut last = None;
    for strategy in strategies {
        match strategy.attempt(input, &scratch) {
            Ok(docx_path) => {
                log::debug!("converted {} via {}", input.display(), strategy.name());
                return Ok(Conversion { docx_path, scratch });
            },
            Err(e @ (Error::ExternalToolUnavailable(_) | Error::ExternalToolFailed { .. })) => {
                log::debug!("{} did not produce output: {e}", strategy.name());
                last = Some(e);
            },
            Err(e) => return Err(e),
        }
    }
    Err(last.unwrap_or_else(|| Error::NoExtractableContent(input.to_path_buf())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx;
    use pulp_zip::ZipReader;

    struct Failing;

    impl ConvertStrategy for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn attempt(&self, _input: &Path, _scratch: &ScratchDir) -> Result<PathBuf> {
            Err(Error::ExternalToolUnavailable("missing-converter"))
        }
    }

    #[test]
    fn falls_through_to_salvage_and_extracts() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let input = scratch.join("legacy.doc");
        let mut bytes = vec![0x00, 0x01];
        bytes.extend_from_slice(b"Recovered paragraph");
        bytes.push(0x00);
        fs::write(&input, &bytes).unwrap();

        let conversion =
            convert_with(&input, &[&Failing, &SalvageConverter]).unwrap();
        let docx = fs::read(conversion.docx_path()).unwrap();
        let archive = ZipReader::parse(&docx).unwrap();
        assert_eq!(docx::extract(&archive), "Recovered paragraph");
    }

    #[test]
    fn zero_salvaged_lines_names_the_source_file() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let input = scratch.join("noise.doc");
        fs::write(&input, [0x00u8, 0x01, 0x02, 0x7F]).unwrap();

        let err = convert_with(&input, &[&SalvageConverter]).unwrap_err();
        match err {
            Error::NoExtractableContent(path) => assert_eq!(path, input),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scratch_released_when_conversion_drops() {
        let scratch = ScratchDir::new("pulp-test-").unwrap();
        let input = scratch.join("legacy.doc");
        fs::write(&input, b"Some legacy body text").unwrap();

        let temp_dir = {
            let conversion = convert_with(&input, &[&SalvageConverter]).unwrap();
            conversion.docx_path().parent().unwrap().to_path_buf()
        };
        assert!(!temp_dir.exists());
    }
}
