//! Attribute metadata.

use crate::matcher::StringMatch;
use std::fmt;
use std::sync::Arc;
use tcc_object::Value;

/// Predicate over a loaded value; the error text is reported as-is
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Type an attribute is read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrType {
    /// 64-bit integer
    Int,
    /// Boolean
    Bool,
    /// Floating point
    Float,
    /// String
    String,
    /// List of strings
    StringList,
}

/// One attribute of a schema node
#[derive(Clone)]
pub struct Attribute {
    /// Name in the object tree
    pub name: String,
    /// Type read from the document
    pub ty: AttrType,
    /// Loading fails if absent
    pub required: bool,
    /// Value is the name matched by the last path matcher
    pub key: bool,
    /// Stored when absent; skipped on dump when equal
    pub default: Option<Value>,
    /// Where the value lives; empty means `[name]`
    pub path: Vec<StringMatch>,
    /// Fallback path tried when `path` yields nothing
    pub compat: Vec<StringMatch>,
    validator: Option<Validator>,
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("key", &self.key)
            .field("default", &self.default)
            .field("path", &self.path)
            .field("compat", &self.compat)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl Attribute {
    /// Create an optional attribute of type `ty`
    #[must_use]
    pub fn new(name: impl Into<String>, ty: AttrType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            key: false,
            default: None,
            path: Vec::new(),
            compat: Vec::new(),
            validator: None,
        }
    }

    /// String attribute
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttrType::String)
    }

    /// Integer attribute
    #[must_use]
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, AttrType::Int)
    }

    /// Boolean attribute
    #[must_use]
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, AttrType::Bool)
    }

    /// Float attribute
    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, AttrType::Float)
    }

    /// String list attribute
    #[must_use]
    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, AttrType::StringList)
    }

    /// Mark as required
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as a key attribute
    #[must_use]
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    /// Set a default
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the source path
    #[must_use]
    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StringMatch>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Set the compatibility path
    #[must_use]
    pub fn with_compat<I, S>(mut self, compat: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StringMatch>,
    {
        self.compat = compat.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a validator
    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Path actually walked
    #[must_use]
    pub fn effective_path(&self) -> Vec<StringMatch> {
        if self.path.is_empty() {
            vec![StringMatch::Exact(self.name.clone())]
        } else {
            self.path.clone()
        }
    }

    /// Whether `value` equals the declared default
    #[must_use]
    pub fn is_default(&self, value: &Value) -> bool {
        self.default.as_ref().is_some_and(|d| d == value)
    }

    /// Run the validator, if any
    ///
    /// # Errors
    ///
    /// Returns the validator's message
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match &self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}
