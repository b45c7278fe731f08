use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Scratch directory for one synthesis request.
///
/// Intermediate files (silent render, narration, looped audio, mux output)
/// live here and are removed when the workspace is dropped, whether the
/// request succeeded or not.
pub struct RequestWorkspace {
    dir: TempDir,
}

impl RequestWorkspace {
    pub fn create(root: &Path, request_id: &str) -> io::Result<Self> {
        fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{request_id}-"))
            .tempdir_in(root)?;
        log::debug!("Request workspace at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Removes the directory now, reporting failures instead of ignoring them.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}
