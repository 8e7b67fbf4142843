//! The query cursor.
//!
//! A [`Query`] is a path into the tree: directory segments first, then, once
//! [`Query::document`] has been called, keys inside the YAML document
//! `<path>.yaml`. Nothing touches the filesystem until a value is read, a
//! listing is requested or staged writes are synced.
//!
//! Forks share one document cache and one write buffer, so a write staged
//! through any fork is flushed by [`Query::sync`] on any other.

use crate::backend::{Entry, Filesystem, join_path};
use crate::document::{Document, FromNode, Lookup, mapping_keys};
use crate::error::{FsError, FsResult};
use parking_lot::Mutex;
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tcc_core::Location;
use tokio_util::sync::CancellationToken;
use tracing::trace;

const EXTENSION: &str = ".yaml";

#[derive(Debug)]
struct Staged {
    document: String,
    keys: Vec<String>,
    value: Value,
}

#[derive(Default)]
struct Shared {
    documents: HashMap<String, Arc<Document>>,
    staged: Vec<Staged>,
    dirty: BTreeMap<String, Mapping>,
}

/// Cursor over a [`Filesystem`]
#[derive(Clone)]
pub struct Query {
    fs: Arc<dyn Filesystem>,
    shared: Arc<Mutex<Shared>>,
    segments: Vec<String>,
    document: Option<usize>,
    location: Location,
    cancel: Option<CancellationToken>,
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("path", &self.path())
            .field("location", &self.location)
            .finish()
    }
}

impl Query {
    /// Cursor at the root of `fs`
    #[must_use]
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            shared: Arc::new(Mutex::new(Shared::default())),
            segments: Vec::new(),
            document: None,
            location: Location::unknown(),
            cancel: None,
        }
    }

    /// Fail I/O-bearing operations once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Underlying filesystem
    #[must_use]
    pub fn filesystem(&self) -> &Arc<dyn Filesystem> {
        &self.fs
    }

    /// Same path, independent future
    #[must_use]
    pub fn fork(&self) -> Self {
        let mut fork = self.clone();
        fork.location = Location::unknown();
        fork
    }

    /// Descend one segment
    pub fn get(&mut self, name: &str) -> &mut Self {
        self.segments.push(name.to_string());
        self
    }

    /// Treat the current path as the document `<path>.yaml`
    pub fn document(&mut self) -> &mut Self {
        if self.document.is_none() {
            self.document = Some(self.segments.len());
        }
        self
    }

    /// Whether the cursor points into a document
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.document.is_some()
    }

    /// Location of the last value read or attempted
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Virtual path of the document, if the cursor is inside one
    #[must_use]
    pub fn document_path(&self) -> Option<String> {
        self.document
            .map(|split| format!("{}{}", join_path(&self.segments[..split]), EXTENSION))
    }

    /// Human readable cursor path
    #[must_use]
    pub fn path(&self) -> String {
        match self.document {
            Some(split) if split < self.segments.len() => format!(
                "{}#{}",
                self.document_path().unwrap_or_default(),
                self.segments[split..].join("/")
            ),
            Some(_) => self.document_path().unwrap_or_default(),
            None => join_path(&self.segments),
        }
    }

    fn keys(&self) -> &[String] {
        match self.document {
            Some(split) => &self.segments[split..],
            None => &[],
        }
    }

    fn check(&self) -> FsResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(FsError::Cancelled),
            _ => Ok(()),
        }
    }

    fn load(&mut self) -> FsResult<Arc<Document>> {
        self.check()?;
        let path = self.document_path().ok_or_else(|| FsError::NotDocument {
            path: self.path(),
        })?;
        self.location = Location::in_file(&path);

        if let Some(doc) = self.shared.lock().documents.get(&path) {
            return Ok(Arc::clone(doc));
        }

        trace!(path = %path, "loading document");
        let bytes = self.fs.read(&path)?;
        let doc = Arc::new(Document::parse(&path, &bytes)?);
        self.shared
            .lock()
            .documents
            .insert(path, Arc::clone(&doc));
        Ok(doc)
    }

    /// Names of the direct children at the cursor.
    ///
    /// Outside a document: sub-directories and `*.yaml` base names. Inside a
    /// document: the keys of the mapping at the cursor, in document order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing directory or document, `Structure`
    /// when the node at the cursor is not a mapping
    pub fn list(&mut self) -> FsResult<Vec<String>> {
        if self.document.is_none() {
            self.check()?;
            let dir = join_path(&self.segments);
            let mut names: Vec<String> = self
                .fs
                .list(&dir)?
                .into_iter()
                .filter_map(|Entry { name, is_dir }| {
                    if is_dir {
                        Some(name)
                    } else {
                        name.strip_suffix(EXTENSION).map(str::to_string)
                    }
                })
                .collect();
            names.sort();
            names.dedup();
            return Ok(names);
        }

        let doc = self.load()?;
        let keys = self.keys().to_vec();
        if keys.is_empty() && doc.is_empty() {
            return Ok(Vec::new());
        }
        match doc.lookup(&keys) {
            Lookup::Found(node, location) => {
                self.location = location.clone();
                mapping_keys(node).ok_or(FsError::Structure { location })
            }
            Lookup::Absent(location) => {
                self.location = location.clone();
                Err(FsError::Missing { location })
            }
            Lookup::Mismatch(location) => {
                self.location = location.clone();
                Err(FsError::Structure { location })
            }
        }
    }

    /// Read the value at the cursor as `T`
    ///
    /// # Errors
    ///
    /// Returns `Missing` when nothing is there, `Structure` when the value
    /// has the wrong shape, `InvalidYaml` for unparseable documents
    pub fn value<T: FromNode>(&mut self) -> FsResult<T> {
        let doc = self.load()?;
        let keys = self.keys().to_vec();
        match doc.lookup(&keys) {
            Lookup::Found(node, location) => {
                self.location = location.clone();
                T::from_node(node).ok_or(FsError::Structure { location })
            }
            Lookup::Absent(location) => {
                self.location = location.clone();
                Err(FsError::Missing { location })
            }
            Lookup::Mismatch(location) => {
                self.location = location.clone();
                Err(FsError::Structure { location })
            }
        }
    }

    /// Stage a write of `value` at the cursor
    ///
    /// A mapping staged onto an existing mapping is merged into it.
    ///
    /// # Errors
    ///
    /// Returns `NotDocument` if the cursor is not inside a document
    pub fn set(&mut self, value: impl Into<Value>) -> FsResult<()> {
        let document = self.document_path().ok_or_else(|| FsError::NotDocument {
            path: self.path(),
        })?;
        let keys = self.keys().to_vec();
        self.shared.lock().staged.push(Staged {
            document,
            keys,
            value: value.into(),
        });
        Ok(())
    }

    /// Make sure a (possibly empty) mapping exists at the cursor
    ///
    /// # Errors
    ///
    /// Returns `NotDocument` if the cursor is not inside a document
    pub fn touch(&mut self) -> FsResult<()> {
        self.set(Value::Mapping(Mapping::new()))
    }

    /// Apply staged writes to the in-memory document buffers
    ///
    /// # Errors
    ///
    /// Returns error if an existing document cannot be read back
    pub fn commit(&self) -> FsResult<()> {
        let mut shared = self.shared.lock();
        let staged = std::mem::take(&mut shared.staged);
        for Staged {
            document,
            keys,
            value,
        } in staged
        {
            if !shared.dirty.contains_key(&document) {
                let base = self.existing(&document)?;
                shared.dirty.insert(document.clone(), base);
            }
            if let Some(root) = shared.dirty.get_mut(&document) {
                place(root, &keys, value);
            }
        }
        Ok(())
    }

    fn existing(&self, document: &str) -> FsResult<Mapping> {
        if !self.fs.is_file(document) {
            return Ok(Mapping::new());
        }
        let bytes = self.fs.read(document)?;
        match serde_yaml::from_slice::<Value>(&bytes) {
            Ok(Value::Mapping(mapping)) => Ok(mapping),
            Ok(_) => Ok(Mapping::new()),
            Err(_) => Err(FsError::InvalidYaml {
                location: Location::in_file(document),
            }),
        }
    }

    /// Commit, then persist every touched document
    ///
    /// Each document is written in one call, so a failure leaves it either
    /// fully old or fully new.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` or the first write failure
    pub fn sync(&self) -> FsResult<()> {
        self.check()?;
        self.commit()?;

        let mut shared = self.shared.lock();
        let dirty = std::mem::take(&mut shared.dirty);
        for (path, mapping) in dirty {
            self.check()?;
            let text = serde_yaml::to_string(&Value::Mapping(mapping)).map_err(|e| FsError::Io {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            trace!(path = %path, "sync");
            self.fs.write(&path, text.as_bytes())?;
            shared.documents.remove(&path);
        }
        Ok(())
    }
}

fn place(root: &mut Mapping, keys: &[String], value: Value) {
    let Some((last, parents)) = keys.split_last() else {
        if let Value::Mapping(incoming) = value {
            merge(root, incoming);
        }
        return;
    };

    let mut current = root;
    for key in parents {
        let slot = current
            .entry(Value::String(key.clone()))
            .or_insert(Value::Mapping(Mapping::new()));
        if !slot.is_mapping() {
            *slot = Value::Mapping(Mapping::new());
        }
        let Value::Mapping(next) = slot else {
            return;
        };
        current = next;
    }

    match value {
        Value::Mapping(incoming) => {
            if let Some(Value::Mapping(existing)) = current.get_mut(last.as_str()) {
                merge(existing, incoming);
                return;
            }
            current.insert(Value::String(last.clone()), Value::Mapping(incoming));
        }
        value => {
            current.insert(Value::String(last.clone()), value);
        }
    }
}

fn merge(into: &mut Mapping, from: Mapping) {
    for (key, value) in from {
        match value {
            Value::Mapping(incoming) => {
                if let Some(Value::Mapping(existing)) = into.get_mut(&key) {
                    merge(existing, incoming);
                    continue;
                }
                into.insert(key, Value::Mapping(incoming));
            }
            value => {
                into.insert(key, value);
            }
        }
    }
}
