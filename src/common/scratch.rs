//! Scoped temporary directories.
//!
//! Legacy conversion and PDF rasterization need a private directory for
//! intermediate files. The directory is acquired up front and released
//! unconditionally when the guard drops, on every exit path including
//! errors from external-process invocation.

use crate::common::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory released on drop.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a fresh scratch directory with a recognizable prefix.
    pub fn new(prefix: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .tempdir()?;
        Ok(Self { dir })
    }

    /// Path of the directory.
    #[inline]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Build a path to a file inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Disarm cleanup and hand ownership of the directory to the caller.
    ///
    /// Used by vision-mode rendering, where the returned page images must
    /// outlive the extraction call. The caller becomes responsible for
    /// removing the directory.
    pub fn persist(self) -> PathBuf {
        self.dir.keep()
    }
}
