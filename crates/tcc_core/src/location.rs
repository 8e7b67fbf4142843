//! Source positions inside the project tree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a value in a source document.
///
/// `line` and `column` are 1-based; zero means the position inside the file
/// is unknown. An empty `file` means nothing is known at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Virtual path of the document (`/functions/hello.yaml`)
    pub file: String,
    /// Line, 1-based
    pub line: usize,
    /// Column, 1-based
    pub column: usize,
}

impl Location {
    /// Create a fully known location
    #[must_use]
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location that only knows the file
    #[must_use]
    pub fn in_file(file: impl Into<String>) -> Self {
        Self::new(file, 0, 0)
    }

    /// Location that knows nothing
    #[must_use]
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether at least the file is known
    #[must_use]
    pub fn is_known(&self) -> bool {
        !self.file.is_empty()
    }

    /// Whether line and column are known
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.is_known() && self.line > 0
    }

    /// Message prefix: `file:line:col: `, `file: ` or nothing.
    #[must_use]
    pub fn prefix(&self) -> String {
        if self.is_known() {
            format!("{}: ", self)
        } else {
            String::new()
        }
    }

    /// Destructure into `(file, line, column)`; `("", 0, 0)` when unknown.
    #[must_use]
    pub fn parts(&self) -> (&str, usize, usize) {
        (&self.file, self.line, self.column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_position() {
            write!(f, "{}:{}:{}", self.file, self.line, self.column)
        } else {
            write!(f, "{}", self.file)
        }
    }
}
