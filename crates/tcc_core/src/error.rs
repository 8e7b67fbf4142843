//! Core error types for the compiler.

use crate::location::Location;
use std::fmt;

/// Core result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error pinned to a position in the source tree
    Located {
        /// Where the error was raised
        location: Location,
        /// Message without the location prefix
        message: String,
    },

    /// Something that was expected to exist does not
    NotExist {
        /// What is missing
        what: String,
    },

    /// Something that must be unique already exists
    AlreadyExists {
        /// What collided
        what: String,
    },

    /// Schema definition or schema-driven load/dump failure
    Schema {
        /// Error message
        message: String,
    },

    /// A named reference could not be resolved
    Reference {
        /// Resource category (`domains`, `libraries`)
        category: String,
        /// Offending name or id
        name: String,
    },

    /// A pass hit an internal invariant violation
    Pipeline {
        /// Pass that failed
        pass: String,
        /// What went wrong
        reason: String,
    },

    /// Value rejected
    Validation {
        /// Field being validated
        field: String,
        /// Reason
        reason: String,
    },

    /// Filesystem failure
    Io {
        /// Error message
        reason: String,
    },

    /// Cancelled through the context
    Cancelled,
}

impl CoreError {
    /// Build a located error from a plain message
    #[must_use]
    pub fn located(location: Location, message: impl Into<String>) -> Self {
        let message = message.into();
        if location.is_known() {
            Self::Located { location, message }
        } else {
            Self::Schema { message }
        }
    }

    /// Attach a location to an error.
    ///
    /// Errors that already carry a location pass through untouched, so the
    /// prefix is added at most once however many layers wrap the error.
    #[must_use]
    pub fn at(location: &Location, err: impl Into<CoreError>) -> Self {
        let err = err.into();
        if err.is_located() || !location.is_known() {
            return err;
        }
        Self::Located {
            location: location.clone(),
            message: err.to_string(),
        }
    }

    /// Whether the error already carries a location
    #[must_use]
    pub fn is_located(&self) -> bool {
        matches!(self, Self::Located { .. })
    }

    /// Location of the error, if any
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Located { location, .. } => Some(location),
            _ => None,
        }
    }

    /// Shorthand for a schema error
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Shorthand for a pipeline error
    #[must_use]
    pub fn pipeline(pass: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Pipeline {
            pass: pass.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an unresolved reference
    #[must_use]
    pub fn reference(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Reference {
            category: category.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Located { location, message } => write!(f, "{}{}", location.prefix(), message),
            Self::NotExist { what } => write!(f, "{} does not exist", what),
            Self::AlreadyExists { what } => write!(f, "{} already exists", what),
            Self::Schema { message } => write!(f, "{}", message),
            Self::Reference { category, name } => {
                write!(f, "unresolved reference to {} `{}`", category, name)
            }
            Self::Pipeline { pass, reason } => write!(f, "{} failed: {}", pass, reason),
            Self::Validation { field, reason } => {
                write!(f, "validation failed for {}: {}", field, reason)
            }
            Self::Io { reason } => write!(f, "io error: {}", reason),
            Self::Cancelled => write!(f, "operation cancelled"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation {
            field: "json".to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::NotExist {
            what: "attribute `id`".to_string(),
        };
        assert_eq!(format!("{}", err), "attribute `id` does not exist");

        let err = CoreError::reference("domains", "ghost");
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_located_display() {
        let err = CoreError::located(Location::new("/domains/d.yaml", 2, 7), "invalid fqdn");
        assert_eq!(err.to_string(), "/domains/d.yaml:2:7: invalid fqdn");

        let err = CoreError::located(Location::in_file("/config.yaml"), "invalid YAML format");
        assert_eq!(err.to_string(), "/config.yaml: invalid YAML format");
    }

    #[test]
    fn test_located_without_location() {
        let err = CoreError::located(Location::unknown(), "boom");
        assert_eq!(err.to_string(), "boom");
        assert!(!err.is_located());
    }

    #[test]
    fn test_at_wraps_once() {
        let inner = Location::new("/a.yaml", 1, 1);
        let outer = Location::new("/b.yaml", 3, 4);

        let err = CoreError::at(&inner, CoreError::schema("bad value"));
        let err = CoreError::at(&outer, err);

        assert_eq!(err.to_string(), "/a.yaml:1:1: bad value");
        assert_eq!(err.location(), Some(&inner));
    }

    #[test]
    fn test_at_unknown_location_passes_through() {
        let err = CoreError::at(&Location::unknown(), CoreError::Cancelled);
        assert_eq!(err, CoreError::Cancelled);
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(CoreError::Cancelled, CoreError::Cancelled);
        assert_ne!(CoreError::Cancelled, CoreError::schema("x"));
    }
}
