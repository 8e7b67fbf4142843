//! Selectors: short-lived views on one child position.
//!
//! A selector remembers its parent and the child key, plus an error slot. A
//! lookup that fails early is carried along and surfaced by the first
//! operation that needs the child, so chains like
//! `root.child("missing").child("x").get("y")` return an error instead of
//! panicking halfway.

use crate::error::{ObjectError, ObjectResult};
use crate::object::Object;
use crate::value::Value;

/// View on a (possibly absent) child of `parent`
#[derive(Debug)]
pub struct Selector<T> {
    parent: Object<T>,
    key: Option<String>,
    error: Option<ObjectError>,
}

impl<T> Selector<T> {
    pub(crate) fn named(parent: Object<T>, key: &str) -> Self {
        Self {
            parent,
            key: Some(key.to_string()),
            error: None,
        }
    }

    pub(crate) fn failed(parent: Object<T>, error: ObjectError) -> Self {
        Self {
            parent,
            key: None,
            error: Some(error),
        }
    }

    fn ready(&self) -> ObjectResult<&str> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        match self.key.as_deref() {
            Some("") | None => Err(ObjectError::EmptyKey),
            Some(key) => Ok(key),
        }
    }

    /// The parent object
    #[must_use]
    pub fn parent(&self) -> &Object<T> {
        &self.parent
    }

    /// Current child key
    ///
    /// # Errors
    ///
    /// Returns the carried error, or `EmptyKey`
    pub fn name(&self) -> ObjectResult<&str> {
        self.ready()
    }

    /// Whether the child exists
    #[must_use]
    pub fn exists(&self) -> bool {
        self.ready().is_ok_and(|key| self.parent.has_child(key))
    }

    /// Handle to the child
    ///
    /// # Errors
    ///
    /// Returns the carried error, or `NotExist` if there is no such child
    pub fn object(&self) -> ObjectResult<Object<T>> {
        let key = self.ready()?;
        self.parent
            .child_object(key)
            .ok_or_else(|| ObjectError::not_exist(format!("child `{}`", key)))
    }

    /// Handle to the child, creating it if absent
    ///
    /// # Errors
    ///
    /// Returns the carried error
    pub fn create(&self) -> ObjectResult<Object<T>> {
        let key = self.ready()?;
        Ok(self.parent.create_path(&[key]))
    }

    /// Selector on a grandchild
    #[must_use]
    pub fn child(&self, name: &str) -> Selector<T> {
        match self.object() {
            Ok(object) => Selector::named(object, name),
            Err(err) => Selector::failed(self.parent.clone(), err),
        }
    }

    /// Put `object` at this position, replacing what was there
    ///
    /// # Errors
    ///
    /// Returns the carried error
    pub fn add(&self, object: Object<T>) -> ObjectResult<()> {
        let key = self.ready()?;
        self.parent.insert_child(key, object);
        Ok(())
    }

    /// Detach the child from its parent
    ///
    /// # Errors
    ///
    /// Returns the carried error, or `NotExist`
    pub fn delete(&self) -> ObjectResult<Object<T>> {
        let key = self.ready()?;
        self.parent
            .remove_child(key)
            .ok_or_else(|| ObjectError::not_exist(format!("child `{}`", key)))
    }

    /// Re-key the child under `new_name` without copying it
    ///
    /// # Errors
    ///
    /// Returns `EmptyKey` or the carried error, `NotExist` if the child is
    /// gone, `AlreadyExists` if another child already holds `new_name`
    pub fn rename(&mut self, new_name: &str) -> ObjectResult<()> {
        let key = self.ready()?.to_string();
        if new_name.is_empty() {
            return Err(ObjectError::EmptyKey);
        }
        if key == new_name {
            return Ok(());
        }
        let mut inner = self.parent.inner.write();
        if inner.children.contains_key(new_name) {
            return Err(ObjectError::AlreadyExists {
                what: format!("child `{}`", new_name),
            });
        }
        let object = inner
            .children
            .remove(&key)
            .ok_or_else(|| ObjectError::not_exist(format!("child `{}`", key)))?;
        inner.children.insert(new_name.to_string(), object);
        drop(inner);
        self.key = Some(new_name.to_string());
        Ok(())
    }
}

impl<T: Clone> Selector<T> {
    /// Attribute of the child
    ///
    /// # Errors
    ///
    /// Returns the carried error, or `NotExist`
    pub fn get(&self, name: &str) -> ObjectResult<T> {
        self.object()?
            .get(name)
            .ok_or_else(|| ObjectError::not_exist(format!("attribute `{}`", name)))
    }

    /// Set an attribute on the child, creating the child if needed
    ///
    /// # Errors
    ///
    /// Returns the carried error
    pub fn set(&self, name: &str, value: impl Into<T>) -> ObjectResult<()> {
        self.create()?.set(name, value);
        Ok(())
    }
}

impl Selector<Value> {
    /// String attribute of the child
    ///
    /// # Errors
    ///
    /// Returns the carried error, `NotExist` or `WrongType`
    pub fn get_string(&self, name: &str) -> ObjectResult<String> {
        self.object()?.get_string(name)
    }

    /// Integer attribute of the child
    ///
    /// # Errors
    ///
    /// Returns the carried error, `NotExist`, `NotInteger` or `WrongType`
    pub fn get_int(&self, name: &str) -> ObjectResult<i64> {
        self.object()?.get_int(name)
    }

    /// Boolean attribute of the child
    ///
    /// # Errors
    ///
    /// Returns the carried error, `NotExist` or `WrongType`
    pub fn get_bool(&self, name: &str) -> ObjectResult<bool> {
        self.object()?.get_bool(name)
    }
}
