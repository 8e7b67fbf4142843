//! Filesystem backed by a directory on disk.

use crate::backend::{Entry, Filesystem, split_path};
use crate::error::{FsError, FsResult};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Maps virtual paths under a root directory
#[derive(Debug, Clone)]
pub struct OsFs {
    root: PathBuf,
}

impl OsFs {
    /// Create a filesystem rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for segment in split_path(path) {
            full.push(segment);
        }
        full
    }
}

fn map_io(path: &str, err: io::Error) -> FsError {
    if err.kind() == io::ErrorKind::NotFound {
        FsError::NotFound {
            path: path.to_string(),
        }
    } else {
        FsError::Io {
            path: path.to_string(),
            reason: err.to_string(),
        }
    }
}

impl Filesystem for OsFs {
    fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        trace!(path, "read");
        std::fs::read(self.resolve(path)).map_err(|e| map_io(path, e))
    }

    fn write(&self, path: &str, data: &[u8]) -> FsResult<()> {
        trace!(path, bytes = data.len(), "write");
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).map_err(|e| map_io(path, e))?;
        }
        std::fs::write(full, data).map_err(|e| map_io(path, e))
    }

    fn list(&self, path: &str) -> FsResult<Vec<Entry>> {
        trace!(path, "list");
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(self.resolve(path)).map_err(|e| map_io(path, e))? {
            let entry = entry.map_err(|e| map_io(path, e))?;
            let is_dir = entry.file_type().map_err(|e| map_io(path, e))?.is_dir();
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        entries.sort();
        Ok(entries)
    }

    fn is_file(&self, path: &str) -> bool {
        self.resolve(path).is_file()
    }
}
