//! Reference attribute values.

use crate::object::Object;
use std::fmt;

/// A typed attribute value
#[derive(Debug, Clone)]
pub enum Value {
    /// Explicit nothing; present but empty
    Null,
    /// Integer
    Int(i64),
    /// Boolean
    Bool(bool),
    /// Floating point
    Float(f64),
    /// String
    Str(String),
    /// Ordered list of strings
    List(Vec<String>),
    /// Nested object
    Obj(Object<Value>),
}

impl Value {
    /// Short name of the variant, for error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(_) => "string list",
            Self::Obj(_) => "object",
        }
    }

    /// Whether the value is `Null`
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow as a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Copy out a boolean
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Copy out an integer
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow as a string list
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the nested object
    #[must_use]
    pub fn as_object(&self) -> Option<&Object<Value>> {
        match self {
            Self::Obj(o) => Some(o),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Obj(a), Self::Obj(b)) => a.deep_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Int(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Float(x) => write!(f, "{}", x),
            Self::Str(s) => write!(f, "{}", s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
            Self::Obj(o) => write!(f, "{{{} children}}", o.children().len()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Object<Value>> for Value {
    fn from(o: Object<Value>) -> Self {
        Self::Obj(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(3i64).as_int(), Some(3));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
        assert_eq!(Value::from(1.5).as_str(), None);
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::from(vec!["a".to_string()]), Value::List(vec!["a".into()]));
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_object_values_compare_structurally() {
        let a = Object::new();
        a.set("k", Value::from("v"));
        let b = Object::new();
        b.set("k", Value::from("v"));
        assert_eq!(Value::Obj(a), Value::Obj(b));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec!["a".into(), "b".into()]).to_string(), "[a, b]");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
