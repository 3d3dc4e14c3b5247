//! External process invocation.
//!
//! Every collaborator binary (converter, rasterizer, OCR engine, PDF
//! CLIs) is run through this helper so missing-binary and failed-run
//! errors classify uniformly: `ENOENT` becomes a recoverable
//! `ExternalToolUnavailable` (reported once per process), everything
//! else a recoverable `ExternalToolFailed`.

use crate::common::error::{Error, Result};
use crate::common::warnings;
use std::io::ErrorKind;
use std::process::{Command, Output};

/// Run a collaborator tool to completion, capturing its output.
pub(crate) fn run(tool: &'static str, cmd: &mut Command) -> Result<Output> {
    log::debug!("running {tool}: {cmd:?}");
    match cmd.output() {
        Ok(output) if output.status.success() => Ok(output),
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(Error::ExternalToolFailed {
                tool,
                reason: format!(
                    "{}: {}",
                    output.status,
                    stderr.lines().next().unwrap_or("no diagnostic output")
                ),
            })
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warnings::warn_tool_missing(tool);
            Err(Error::ExternalToolUnavailable(tool))
        },
        Err(e) => Err(Error::ExternalToolFailed {
            tool,
            reason: e.to_string(),
        }),
    }
}
