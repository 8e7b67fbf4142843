//! Object model errors.

use tcc_core::CoreError;

/// Object result type
pub type ObjectResult<T> = Result<T, ObjectError>;

/// Object model error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectError {
    /// Attribute, child or path hop missing
    #[error("{what} does not exist")]
    NotExist {
        /// What was looked up
        what: String,
    },

    /// Child name already taken by another object
    #[error("{what} already exists")]
    AlreadyExists {
        /// Colliding name
        what: String,
    },

    /// Attribute holds a different kind of value
    #[error("attribute `{name}` is not a {expected}")]
    WrongType {
        /// Attribute name
        name: String,
        /// Requested kind
        expected: &'static str,
    },

    /// Float with a fractional part read as an integer
    #[error("value is not an integer")]
    NotInteger,

    /// Selector has no key to operate on
    #[error("current key is empty")]
    EmptyKey,

    /// Object identity is not a child of the selector's parent
    #[error("object is not a child of this parent")]
    NotChild,

    /// Regex did not compile
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// Pattern text
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Opaque value could not be decoded
    #[error("cannot decode attribute `{name}`: {reason}")]
    Decode {
        /// Attribute name
        name: String,
        /// Decoder message
        reason: String,
    },
}

impl ObjectError {
    /// Shorthand for a missing thing
    #[must_use]
    pub fn not_exist(what: impl Into<String>) -> Self {
        Self::NotExist { what: what.into() }
    }
}

impl From<ObjectError> for CoreError {
    fn from(err: ObjectError) -> Self {
        match err {
            ObjectError::NotExist { what } => CoreError::NotExist { what },
            ObjectError::AlreadyExists { what } => CoreError::AlreadyExists { what },
            other => CoreError::schema(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core() {
        let err: CoreError = ObjectError::not_exist("attribute `id`").into();
        assert_eq!(err.to_string(), "attribute `id` does not exist");

        let err: CoreError = ObjectError::NotInteger.into();
        assert_eq!(err.to_string(), "value is not an integer");
    }
}
