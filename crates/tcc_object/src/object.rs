//! Object tree.
//!
//! An [`Object`] is a shared handle: cloning it yields another handle to the
//! same node, and identity is handle equality. Ownership still flows strictly
//! parent to child, so the tree has no cycles; renaming a child swaps the key
//! in its parent's map and never copies the node.

use crate::error::{ObjectError, ObjectResult};
use crate::matching::{MatchMode, RegexCache};
use crate::selector::Selector;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub(crate) struct Inner<T> {
    pub(crate) attributes: IndexMap<String, T>,
    pub(crate) children: BTreeMap<String, Object<T>>,
    pub(crate) patterns: RegexCache,
}

/// A node with named attributes and named children
pub struct Object<T> {
    pub(crate) inner: Arc<RwLock<Inner<T>>>,
}

/// How a child is addressed: by name or by identity
#[derive(Debug)]
pub enum ChildRef<'a, T> {
    /// Child key
    Name(&'a str),
    /// Child handle
    Identity(&'a Object<T>),
}

impl<'a, T> From<&'a str> for ChildRef<'a, T> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a, T> From<&'a String> for ChildRef<'a, T> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl<'a, T> From<&'a Object<T>> for ChildRef<'a, T> {
    fn from(object: &'a Object<T>) -> Self {
        Self::Identity(object)
    }
}

impl<T> Clone for Object<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Object<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Object<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Object")
            .field("attributes", &inner.attributes)
            .field("children", &inner.children)
            .finish()
    }
}

impl<T> Object<T> {
    /// Create an empty object
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                attributes: IndexMap::new(),
                children: BTreeMap::new(),
                patterns: RegexCache::default(),
            })),
        }
    }

    /// Whether both handles point to the same node
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Set an attribute, replacing any previous value
    pub fn set(&self, name: impl Into<String>, value: impl Into<T>) {
        self.inner.write().attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its value
    pub fn delete(&self, name: &str) -> Option<T> {
        self.inner.write().attributes.shift_remove(name)
    }

    /// Whether an attribute is set
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.inner.read().attributes.contains_key(name)
    }

    /// Attribute names in insertion order
    #[must_use]
    pub fn attributes(&self) -> Vec<String> {
        self.inner.read().attributes.keys().cloned().collect()
    }

    /// Move attribute `from` to `to`, replacing any value at `to`
    ///
    /// # Errors
    ///
    /// Returns `NotExist` if `from` is not set; nothing changes in that case
    pub fn move_attr(&self, from: &str, to: &str) -> ObjectResult<()> {
        let mut inner = self.inner.write();
        let value = inner
            .attributes
            .shift_remove(from)
            .ok_or_else(|| ObjectError::not_exist(format!("attribute `{}`", from)))?;
        inner.attributes.insert(to.to_string(), value);
        Ok(())
    }

    /// Names of the direct children, sorted
    #[must_use]
    pub fn children(&self) -> Vec<String> {
        self.inner.read().children.keys().cloned().collect()
    }

    /// Whether a child with this name exists
    #[must_use]
    pub fn has_child(&self, name: &str) -> bool {
        self.inner.read().children.contains_key(name)
    }

    /// Handle to a direct child, if present
    #[must_use]
    pub fn child_object(&self, name: &str) -> Option<Object<T>> {
        self.inner.read().children.get(name).cloned()
    }

    /// Selector for a child by name or identity
    pub fn child<'a>(&self, which: impl Into<ChildRef<'a, T>>) -> Selector<T>
    where
        T: 'a,
    {
        match which.into() {
            ChildRef::Name(name) => Selector::named(self.clone(), name),
            ChildRef::Identity(object) => match self.key_of(object) {
                Some(name) => Selector::named(self.clone(), &name),
                None => Selector::failed(self.clone(), ObjectError::NotChild),
            },
        }
    }

    /// Key under which `object` is held by this parent
    #[must_use]
    pub fn key_of(&self, object: &Object<T>) -> Option<String> {
        self.inner
            .read()
            .children
            .iter()
            .find(|(_, child)| child.ptr_eq(object))
            .map(|(name, _)| name.clone())
    }

    /// Attach `object` under `name`, returning the child it replaced
    pub fn insert_child(&self, name: impl Into<String>, object: Object<T>) -> Option<Object<T>> {
        self.inner.write().children.insert(name.into(), object)
    }

    /// Detach a child
    pub fn remove_child(&self, name: &str) -> Option<Object<T>> {
        self.inner.write().children.remove(name)
    }

    /// Re-key every child at once, each under `key(name, child)`
    ///
    /// A new key may equal the old key of another child. Returns the
    /// `(old, new)` pairs in old-key order; on error no child moves.
    ///
    /// # Errors
    ///
    /// Returns the first error of `key`, `EmptyKey` for an empty old or new
    /// key, or `AlreadyExists` when two children map to the same key
    pub fn rekey<E>(
        &self,
        mut key: impl FnMut(&str, &Object<T>) -> Result<String, E>,
    ) -> Result<Vec<(String, String)>, E>
    where
        E: From<ObjectError>,
    {
        let children: Vec<(String, Object<T>)> = self
            .inner
            .read()
            .children
            .iter()
            .map(|(name, child)| (name.clone(), child.clone()))
            .collect();

        let mut rekeyed = BTreeMap::new();
        let mut pairs = Vec::with_capacity(children.len());
        for (name, child) in children {
            if name.is_empty() {
                return Err(ObjectError::EmptyKey.into());
            }
            let new_name = key(&name, &child)?;
            if new_name.is_empty() {
                return Err(ObjectError::EmptyKey.into());
            }
            if rekeyed.insert(new_name.clone(), child).is_some() {
                return Err(ObjectError::AlreadyExists {
                    what: format!("child `{}`", new_name),
                }
                .into());
            }
            pairs.push((name, new_name));
        }

        self.inner.write().children = rekeyed;
        Ok(pairs)
    }

    /// Strict path lookup; every hop must exist
    ///
    /// # Errors
    ///
    /// Returns `NotExist` naming the first missing hop
    pub fn fetch<S: AsRef<str>>(&self, path: &[S]) -> ObjectResult<Object<T>> {
        let mut current = self.clone();
        for (depth, hop) in path.iter().enumerate() {
            let hop = hop.as_ref();
            current = current.child_object(hop).ok_or_else(|| {
                let walked: Vec<&str> = path[..=depth].iter().map(AsRef::as_ref).collect();
                ObjectError::not_exist(format!("path `{}`", walked.join("/")))
            })?;
        }
        Ok(current)
    }

    /// Idempotent path creation; missing hops become empty objects
    pub fn create_path<S: AsRef<str>>(&self, path: &[S]) -> Object<T> {
        let mut current = self.clone();
        for hop in path {
            let next = {
                let mut inner = current.inner.write();
                inner
                    .children
                    .entry(hop.as_ref().to_string())
                    .or_insert_with(Object::new)
                    .clone()
            };
            current = next;
        }
        current
    }

    /// Names of the children accepted by `expr` under `mode`, sorted
    ///
    /// Regex patterns are compiled once per object and reused.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if a regex does not compile
    pub fn match_children(&self, expr: &str, mode: MatchMode) -> ObjectResult<Vec<String>> {
        let names = self.children();
        if mode != MatchMode::RegEx {
            return Ok(names.into_iter().filter(|n| mode.accepts(expr, n)).collect());
        }
        let regex = self.inner.write().patterns.get_or_compile(expr)?;
        Ok(names.into_iter().filter(|n| regex.is_match(n)).collect())
    }

    /// Number of compiled patterns cached on this object
    #[must_use]
    pub fn cached_patterns(&self) -> usize {
        self.inner.read().patterns.len()
    }
}

impl<T: Clone> Object<T> {
    /// Copy of an attribute value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<T> {
        self.inner.read().attributes.get(name).cloned()
    }

    /// Copy of all attributes in insertion order
    #[must_use]
    pub fn attribute_map(&self) -> IndexMap<String, T> {
        self.inner.read().attributes.clone()
    }

    /// Independent copy of the whole subtree
    #[must_use]
    pub fn deep_clone(&self) -> Object<T> {
        let copy = Object::new();
        let (attributes, children) = {
            let inner = self.inner.read();
            (inner.attributes.clone(), inner.children.clone())
        };
        {
            let mut target = copy.inner.write();
            target.attributes = attributes;
            for (name, child) in children {
                target.children.insert(name, child.deep_clone());
            }
        }
        copy
    }
}

impl<T: PartialEq> Object<T> {
    /// Structural equality, ignoring attribute and child order
    #[must_use]
    pub fn deep_eq(&self, other: &Object<T>) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.inner.read();
        let b = other.inner.read();
        if a.attributes.len() != b.attributes.len() || a.children.len() != b.children.len() {
            return false;
        }
        let attributes_match = a
            .attributes
            .iter()
            .all(|(k, v)| b.attributes.get(k).is_some_and(|w| v == w));
        attributes_match
            && a.children
                .iter()
                .all(|(k, c)| b.children.get(k).is_some_and(|d| c.deep_eq(d)))
    }
}

impl Object<Value> {
    /// Attribute value, or `NotExist`
    ///
    /// # Errors
    ///
    /// Returns `NotExist` if the attribute is not set
    pub fn value(&self, name: &str) -> ObjectResult<Value> {
        self.get(name)
            .ok_or_else(|| ObjectError::not_exist(format!("attribute `{}`", name)))
    }

    /// String attribute
    ///
    /// # Errors
    ///
    /// Returns `NotExist` or `WrongType`
    pub fn get_string(&self, name: &str) -> ObjectResult<String> {
        match self.value(name)? {
            Value::Str(s) => Ok(s),
            _ => Err(wrong_type(name, "string")),
        }
    }

    /// Integer attribute; floats with a zero fraction are accepted
    ///
    /// # Errors
    ///
    /// Returns `NotExist`, `NotInteger` or `WrongType`
    pub fn get_int(&self, name: &str) -> ObjectResult<i64> {
        match self.value(name)? {
            Value::Int(n) => Ok(n),
            Value::Float(x) if x.fract() == 0.0 && x.is_finite() => Ok(x as i64),
            Value::Float(_) => Err(ObjectError::NotInteger),
            _ => Err(wrong_type(name, "int")),
        }
    }

    /// Boolean attribute
    ///
    /// # Errors
    ///
    /// Returns `NotExist` or `WrongType`
    pub fn get_bool(&self, name: &str) -> ObjectResult<bool> {
        match self.value(name)? {
            Value::Bool(b) => Ok(b),
            _ => Err(wrong_type(name, "bool")),
        }
    }

    /// Float attribute; integers widen
    ///
    /// # Errors
    ///
    /// Returns `NotExist` or `WrongType`
    pub fn get_float(&self, name: &str) -> ObjectResult<f64> {
        match self.value(name)? {
            Value::Float(x) => Ok(x),
            Value::Int(n) => Ok(n as f64),
            _ => Err(wrong_type(name, "float")),
        }
    }

    /// String list attribute; `Null` reads as empty
    ///
    /// # Errors
    ///
    /// Returns `NotExist` or `WrongType`
    pub fn get_list(&self, name: &str) -> ObjectResult<Vec<String>> {
        match self.value(name)? {
            Value::List(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            _ => Err(wrong_type(name, "string list")),
        }
    }
}

fn wrong_type(name: &str, expected: &'static str) -> ObjectError {
    ObjectError::WrongType {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Object<Value> {
        let root = Object::new();
        root.set("id", "QmProj1");
        let functions = root.create_path(&["functions"]);
        let hello = functions.create_path(&["hello"]);
        hello.set("id", "QmFn1");
        hello.set("memory", 128_000_000i64);
        root
    }

    #[test]
    fn test_set_get_delete() {
        let o: Object<Value> = Object::new();
        o.set("a", 1i64);
        assert_eq!(o.get("a"), Some(Value::Int(1)));
        assert!(o.has("a"));
        assert_eq!(o.delete("a"), Some(Value::Int(1)));
        assert!(!o.has("a"));
    }

    #[test]
    fn test_rekey_chain() {
        let group: Object<Value> = Object::new();
        group.create_path(&["a"]).set("id", "b");
        group.create_path(&["b"]).set("id", "c");

        let pairs = group
            .rekey(|_, child| child.get_string("id"))
            .unwrap();
        assert_eq!(
            pairs,
            vec![("a".to_string(), "b".to_string()), ("b".to_string(), "c".to_string())]
        );
        assert_eq!(group.children(), vec!["b", "c"]);
        assert_eq!(group.fetch(&["c"]).unwrap().get_string("id").unwrap(), "c");
    }

    #[test]
    fn test_rekey_clash_moves_nothing() {
        let group: Object<Value> = Object::new();
        group.create_path(&["a"]).set("id", "x");
        group.create_path(&["b"]).set("id", "x");

        let err = group.rekey(|_, child| child.get_string("id")).unwrap_err();
        assert_eq!(err, ObjectError::AlreadyExists { what: "child `x`".to_string() });
        assert_eq!(group.children(), vec!["a", "b"]);
    }

    #[test]
    fn test_rekey_empty_key() {
        let group: Object<Value> = Object::new();
        group.create_path(&[""]).set("id", "x");
        assert_eq!(
            group.rekey(|_, child| child.get_string("id")).unwrap_err(),
            ObjectError::EmptyKey
        );

        let group: Object<Value> = Object::new();
        group.create_path(&["a"]);
        assert_eq!(
            group.rekey(|_, _| Ok::<_, ObjectError>(String::new())).unwrap_err(),
            ObjectError::EmptyKey
        );
    }

    #[test]
    fn test_move_attr() {
        let o: Object<Value> = Object::new();
        o.set("http-method", "GET");
        o.move_attr("http-method", "method").unwrap();
        assert!(!o.has("http-method"));
        assert_eq!(o.get_string("method").unwrap(), "GET");

        let err = o.move_attr("http-method", "method").unwrap_err();
        assert!(matches!(err, ObjectError::NotExist { .. }));
        assert_eq!(o.get_string("method").unwrap(), "GET");
    }

    #[test]
    fn test_fetch_strict() {
        let root = tree();
        assert_eq!(
            root.fetch(&["functions", "hello"]).unwrap().get_string("id").unwrap(),
            "QmFn1"
        );
        let err = root.fetch(&["functions", "nope", "deeper"]).unwrap_err();
        assert_eq!(err.to_string(), "path `functions/nope` does not exist");
    }

    #[test]
    fn test_create_path_idempotent() {
        let root = tree();
        let a = root.create_path(&["indexes"]);
        let b = root.create_path(&["indexes"]);
        assert!(a.ptr_eq(&b));
        let hello = root.create_path(&["functions", "hello"]);
        assert!(hello.has("id"));
    }

    #[test]
    fn test_child_by_identity() {
        let root = tree();
        let functions = root.fetch(&["functions"]).unwrap();
        let hello = functions.fetch(&["hello"]).unwrap();
        assert_eq!(functions.child(&hello).name().unwrap(), "hello");
        assert!(root.child(&hello).name().is_err());
    }

    #[test]
    fn test_get_int_coercion() {
        let o: Object<Value> = Object::new();
        o.set("whole", 3.0);
        o.set("half", 3.5);
        o.set("text", "3");
        assert_eq!(o.get_int("whole").unwrap(), 3);
        assert_eq!(o.get_int("half").unwrap_err().to_string(), "value is not an integer");
        assert!(matches!(o.get_int("text"), Err(ObjectError::WrongType { .. })));
        assert!(matches!(o.get_int("missing"), Err(ObjectError::NotExist { .. })));
    }

    #[test]
    fn test_deep_eq_and_clone() {
        let a = tree();
        let b = a.deep_clone();
        assert!(a.deep_eq(&b));
        assert!(!a.ptr_eq(&b));

        b.fetch(&["functions", "hello"]).unwrap().set("memory", 1i64);
        assert!(!a.deep_eq(&b));
        assert_eq!(
            a.fetch(&["functions", "hello"]).unwrap().get_int("memory").unwrap(),
            128_000_000
        );
    }

    #[test]
    fn test_deep_eq_ignores_order() {
        let a: Object<Value> = Object::new();
        a.set("x", 1i64);
        a.set("y", 2i64);
        let b: Object<Value> = Object::new();
        b.set("y", 2i64);
        b.set("x", 1i64);
        assert!(a.deep_eq(&b));
    }

    #[test]
    fn test_match_children() {
        let root: Object<Value> = Object::new();
        for name in ["alpha", "beta", "alphabet"] {
            root.create_path(&[name]);
        }
        assert_eq!(root.match_children("alpha", MatchMode::Exact).unwrap(), vec!["alpha"]);
        assert_eq!(
            root.match_children("alp", MatchMode::Prefix).unwrap(),
            vec!["alpha", "alphabet"]
        );
        assert_eq!(root.match_children("ta", MatchMode::Suffix).unwrap(), vec!["beta"]);
        assert_eq!(
            root.match_children("bet", MatchMode::Contains).unwrap(),
            vec!["alphabet", "beta"]
        );
    }

    #[test]
    fn test_regex_cache_idempotent() {
        let root: Object<Value> = Object::new();
        root.create_path(&["fn-1"]);
        root.create_path(&["fn-22"]);
        root.create_path(&["other"]);

        let first = root.match_children(r"^fn-\d+$", MatchMode::RegEx).unwrap();
        let second = root.match_children(r"^fn-\d+$", MatchMode::RegEx).unwrap();
        assert_eq!(first, vec!["fn-1", "fn-22"]);
        assert_eq!(first, second);
        assert_eq!(root.cached_patterns(), 1);

        root.match_children("^o", MatchMode::RegEx).unwrap();
        assert_eq!(root.cached_patterns(), 2);
    }

    #[test]
    fn test_invalid_regex() {
        let root: Object<Value> = Object::new();
        assert!(matches!(
            root.match_children("(", MatchMode::RegEx),
            Err(ObjectError::InvalidPattern { .. })
        ));
        assert_eq!(root.cached_patterns(), 0);
    }
}
