//! Filesystem and document errors.

use tcc_core::{CoreError, Location};

/// Filesystem result type
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem and document error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FsError {
    /// Path does not exist
    #[error("{path}: no such file or directory")]
    NotFound {
        /// Virtual path
        path: String,
    },

    /// Underlying IO failure
    #[error("{path}: {reason}")]
    Io {
        /// Virtual path
        path: String,
        /// OS error text
        reason: String,
    },

    /// Document could not be parsed
    #[error("invalid YAML format")]
    InvalidYaml {
        /// Document location
        location: Location,
    },

    /// Value present but of the wrong shape
    #[error("field is missing or has incorrect structure")]
    Structure {
        /// Where the offending value starts
        location: Location,
    },

    /// Key not present in the document
    #[error("field is missing")]
    Missing {
        /// Deepest node reached before the walk stopped
        location: Location,
    },

    /// Operation needs a cursor that points into a document
    #[error("cursor `{path}` does not point into a document")]
    NotDocument {
        /// Cursor path
        path: String,
    },

    /// Cancelled through the context
    #[error("operation cancelled")]
    Cancelled,
}

impl FsError {
    /// Source location attached to the error, if any
    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::InvalidYaml { location }
            | Self::Structure { location }
            | Self::Missing { location } => Some(location),
            _ => None,
        }
    }

    /// Whether the error only means "nothing there"
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Missing { .. })
    }
}

impl From<FsError> for CoreError {
    fn from(err: FsError) -> Self {
        match err {
            FsError::Cancelled => CoreError::Cancelled,
            FsError::NotFound { path } => CoreError::NotExist { what: path },
            FsError::Io { .. } => CoreError::Io {
                reason: err.to_string(),
            },
            FsError::InvalidYaml { ref location }
            | FsError::Structure { ref location }
            | FsError::Missing { ref location } => CoreError::located(location.clone(), err.to_string()),
            FsError::NotDocument { .. } => CoreError::schema(err.to_string()),
        }
    }
}
