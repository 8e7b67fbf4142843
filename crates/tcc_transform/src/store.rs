//! Side-channel store shared by every fork of a context.

use crate::validation::NextValidation;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tcc_object::{Object, Value};

#[derive(Default)]
struct Inner {
    strings: IndexMap<String, String>,
    bytes: IndexMap<String, Vec<u8>>,
    objects: IndexMap<String, Object<Value>>,
    validations: Vec<NextValidation>,
}

fn select_strings(inner: &mut Inner) -> &mut IndexMap<String, String> {
    &mut inner.strings
}

fn select_bytes(inner: &mut Inner) -> &mut IndexMap<String, Vec<u8>> {
    &mut inner.bytes
}

fn select_objects(inner: &mut Inner) -> &mut IndexMap<String, Object<Value>> {
    &mut inner.objects
}

/// Shared keyed maps plus the growable validations list
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<Mutex<Inner>>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Store")
            .field("strings", &inner.strings.len())
            .field("bytes", &inner.bytes.len())
            .field("objects", &inner.objects.len())
            .field("validations", &inner.validations.len())
            .finish()
    }
}

/// Accessor over one keyed map of a [`Store`]
pub struct Entries<'a, V> {
    store: &'a Store,
    select: fn(&mut Inner) -> &mut IndexMap<String, V>,
}

impl<V: Clone> Entries<'_, V> {
    /// Copy of the value at `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.store.inner.lock();
        (self.select)(&mut inner).get(key).cloned()
    }

    /// Set `key`, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: V) -> Option<V> {
        let mut inner = self.store.inner.lock();
        (self.select)(&mut inner).insert(key.into(), value)
    }

    /// Whether `key` is set
    #[must_use]
    pub fn exist(&self, key: &str) -> bool {
        let mut inner = self.store.inner.lock();
        (self.select)(&mut inner).contains_key(key)
    }

    /// Remove `key`
    pub fn del(&self, key: &str) -> Option<V> {
        let mut inner = self.store.inner.lock();
        (self.select)(&mut inner).shift_remove(key)
    }

    /// All keys in insertion order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut inner = self.store.inner.lock();
        (self.select)(&mut inner).keys().cloned().collect()
    }
}

/// Accessor over the validations list
pub struct Validations<'a> {
    store: &'a Store,
}

impl Validations<'_> {
    /// Copy of the list
    #[must_use]
    pub fn get(&self) -> Vec<NextValidation> {
        self.store.inner.lock().validations.clone()
    }

    /// Replace the list
    pub fn set(&self, validations: Vec<NextValidation>) {
        self.store.inner.lock().validations = validations;
    }

    /// Append one validation
    pub fn push(&self, validation: NextValidation) {
        self.store.inner.lock().validations.push(validation);
    }

    /// Take the list, leaving it empty
    #[must_use]
    pub fn take(&self) -> Vec<NextValidation> {
        std::mem::take(&mut self.store.inner.lock().validations)
    }
}

impl Store {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// String map
    #[must_use]
    pub fn strings(&self) -> Entries<'_, String> {
        Entries {
            store: self,
            select: select_strings,
        }
    }

    /// Byte blob map
    #[must_use]
    pub fn bytes(&self) -> Entries<'_, Vec<u8>> {
        Entries {
            store: self,
            select: select_bytes,
        }
    }

    /// Object handle map
    #[must_use]
    pub fn objects(&self) -> Entries<'_, Object<Value>> {
        Entries {
            store: self,
            select: select_objects,
        }
    }

    /// Validations list
    #[must_use]
    pub fn validations(&self) -> Validations<'_> {
        Validations { store: self }
    }

    /// Whether two handles share one store
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_accessors() {
        let store = Store::new();
        assert!(!store.strings().exist("functions/hello"));
        store.strings().set("functions/hello", "QmFn1".to_string());
        assert_eq!(store.strings().get("functions/hello").as_deref(), Some("QmFn1"));
        assert_eq!(store.strings().keys(), vec!["functions/hello"]);
        assert_eq!(store.strings().del("functions/hello").as_deref(), Some("QmFn1"));
        assert!(!store.strings().exist("functions/hello"));
    }

    #[test]
    fn test_maps_are_separate() {
        let store = Store::new();
        store.bytes().set("k", vec![1, 2]);
        assert!(!store.strings().exist("k"));
        assert_eq!(store.bytes().get("k"), Some(vec![1, 2]));
    }

    #[test]
    fn test_objects_share_identity() {
        let store = Store::new();
        let indexes: Object<Value> = Object::new();
        store.objects().set("indexes", indexes.clone());
        assert!(store.objects().get("indexes").unwrap().ptr_eq(&indexes));
    }

    #[test]
    fn test_validations() {
        let store = Store::new();
        let clone = store.clone();
        clone.validations().push(NextValidation::project_id("QmProj1"));
        assert_eq!(store.validations().get().len(), 1);
        assert!(store.ptr_eq(&clone));

        store.validations().set(Vec::new());
        assert!(clone.validations().get().is_empty());
    }
}
