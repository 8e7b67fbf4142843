//! In-memory filesystem.

use crate::backend::{Entry, Filesystem, join_path, split_path};
use crate::error::{FsError, FsResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Files kept in a sorted map; directories are implied by file prefixes.
#[derive(Debug, Default)]
pub struct MemFs {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemFs {
    /// Create an empty filesystem
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (builder style)
    #[must_use]
    pub fn with_file(self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.insert(path, content);
        self
    }

    /// Add or replace a file
    pub fn insert(&self, path: &str, content: impl AsRef<[u8]>) {
        self.files
            .write()
            .insert(normalize(path), content.as_ref().to_vec());
    }

    /// All file paths, sorted
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.files.read().keys().cloned().collect()
    }

    /// File content as text, if present and valid UTF-8
    #[must_use]
    pub fn read_to_string(&self, path: &str) -> Option<String> {
        self.files
            .read()
            .get(&normalize(path))
            .and_then(|bytes| String::from_utf8(bytes.clone()).ok())
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Whether there are no files
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

fn normalize(path: &str) -> String {
    join_path(&split_path(path).collect::<Vec<_>>())
}

impl Filesystem for MemFs {
    fn read(&self, path: &str) -> FsResult<Vec<u8>> {
        let path = normalize(path);
        self.files
            .read()
            .get(&path)
            .cloned()
            .ok_or(FsError::NotFound { path })
    }

    fn write(&self, path: &str, data: &[u8]) -> FsResult<()> {
        self.insert(path, data);
        Ok(())
    }

    fn list(&self, path: &str) -> FsResult<Vec<Entry>> {
        let dir = normalize(path);
        let prefix = if dir == "/" { dir.clone() } else { format!("{}/", dir) };

        let mut found = BTreeMap::new();
        for key in self.files.read().keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((name, _)) => {
                    found.insert(name.to_string(), true);
                }
                None => {
                    found.entry(rest.to_string()).or_insert(false);
                }
            }
        }

        if found.is_empty() && dir != "/" {
            return Err(FsError::NotFound { path: dir });
        }
        Ok(found
            .into_iter()
            .map(|(name, is_dir)| Entry { name, is_dir })
            .collect())
    }

    fn is_file(&self, path: &str) -> bool {
        self.files.read().contains_key(&normalize(path))
    }
}
