//! Name matchers for schema nodes and attribute path segments.

use std::fmt;

/// Selects entries of the source tree by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringMatch {
    /// Name equals the string
    Exact(String),
    /// Any name
    Any,
    /// Name is one of a closed set
    OneOf(Vec<String>),
}

/// `OneOf` over `options`
#[must_use]
pub fn either(options: &[&str]) -> StringMatch {
    StringMatch::OneOf(options.iter().map(|s| s.to_string()).collect())
}

impl StringMatch {
    /// Whether `name` is accepted
    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        match self {
            Self::Exact(expected) => expected == name,
            Self::Any => true,
            Self::OneOf(options) => options.iter().any(|o| o == name),
        }
    }

    /// The literal name for `Exact`
    #[must_use]
    pub fn exact(&self) -> Option<&str> {
        match self {
            Self::Exact(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&str> for StringMatch {
    fn from(name: &str) -> Self {
        Self::Exact(name.to_string())
    }
}

impl fmt::Display for StringMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => write!(f, "{}", name),
            Self::Any => write!(f, "*"),
            Self::OneOf(options) => write!(f, "either({})", options.join(",")),
        }
    }
}
