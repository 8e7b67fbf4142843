//! The filesystem seam.
//!
//! Paths are virtual: absolute, `/`-separated, no `.` or `..` components.
//! Implementations map them onto whatever actually stores the bytes.

use crate::error::FsResult;
use std::fmt;

/// A directory entry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entry {
    /// Base name
    pub name: String,
    /// Whether the entry is a directory
    pub is_dir: bool,
}

impl Entry {
    /// A file entry
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    /// A directory entry
    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Hierarchical byte storage
pub trait Filesystem: Send + Sync + fmt::Debug {
    /// Read the whole file at `path`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such file
    fn read(&self, path: &str) -> FsResult<Vec<u8>>;

    /// Replace the file at `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns error if the backend cannot store the file
    fn write(&self, path: &str, data: &[u8]) -> FsResult<()>;

    /// List the direct entries of the directory at `path`, sorted by name
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no such directory
    fn list(&self, path: &str) -> FsResult<Vec<Entry>>;

    /// Whether a file exists at `path`
    fn is_file(&self, path: &str) -> bool;
}

/// Join segments into an absolute virtual path
#[must_use]
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::from("/");
    let mut first = true;
    for segment in segments {
        let segment = segment.as_ref().trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !first {
            path.push('/');
        }
        path.push_str(segment);
        first = false;
    }
    path
}

/// Split a virtual path into its non-empty segments
pub(crate) fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
