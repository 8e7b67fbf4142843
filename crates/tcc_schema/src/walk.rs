//! Attribute path walking.

use crate::matcher::StringMatch;
use tcc_core::{CoreError, Location};
use tcc_fs::{FsError, Query};

/// Why a walk stopped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalkError {
    /// No listed name was accepted by a matcher segment
    #[error("can't find match for path")]
    NoMatch {
        /// Position of the node that was listed
        location: Location,
    },

    /// Listing failed
    #[error(transparent)]
    Fs(#[from] FsError),
}

impl WalkError {
    /// Whether the walk just found nothing
    #[must_use]
    pub fn is_absent(&self) -> bool {
        match self {
            Self::NoMatch { .. } => true,
            Self::Fs(err) => err.is_absent(),
        }
    }
}

impl From<WalkError> for CoreError {
    fn from(err: WalkError) -> Self {
        match err {
            WalkError::NoMatch { ref location } => CoreError::located(location.clone(), err.to_string()),
            WalkError::Fs(err) => err.into(),
        }
    }
}

/// Cursor at the end of a walk
#[derive(Debug)]
pub struct Walked {
    /// Cursor positioned at the end of the path
    pub cursor: Query,
    /// Name picked by the last matcher segment
    pub last_match: Option<String>,
}

/// Walk `path` from a fork of `base`.
///
/// Exact segments descend without touching the filesystem; matcher segments
/// list the cursor and pick the first accepted name.
///
/// # Errors
///
/// Returns `NoMatch` when no listed name is accepted, or the listing error
pub fn walk(base: &Query, path: &[StringMatch]) -> Result<Walked, WalkError> {
    let mut cursor = base.fork();
    let mut last_match = None;

    for segment in path {
        match segment {
            StringMatch::Exact(name) => {
                cursor.get(name);
            }
            matcher => {
                let names = cursor.list()?;
                let picked = names
                    .into_iter()
                    .find(|name| matcher.accepts(name))
                    .ok_or_else(|| WalkError::NoMatch {
                        location: cursor.location().clone(),
                    })?;
                cursor.get(&picked);
                last_match = Some(picked);
            }
        }
    }

    Ok(Walked { cursor, last_match })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::either;
    use std::sync::Arc;
    use tcc_fs::MemFs;

    fn library(source: &str) -> Query {
        let fs = Arc::new(MemFs::new().with_file("/libraries/lib.yaml", source));
        let mut q = Query::new(fs);
        q.get("libraries").get("lib").document();
        q
    }

    fn path() -> Vec<StringMatch> {
        vec![
            StringMatch::from("source"),
            either(&["github", "gitlab"]),
            StringMatch::from("fullname"),
        ]
    }

    #[test]
    fn test_either_resolves_present_branch() {
        let q = library("source:\n  gitlab:\n    fullname: org/repo\n");
        let mut walked = walk(&q, &path()).unwrap();
        assert_eq!(walked.last_match.as_deref(), Some("gitlab"));
        assert_eq!(walked.cursor.value::<String>().unwrap(), "org/repo");
    }

    #[test]
    fn test_either_no_branch() {
        let q = library("source:\n  branch: main\n");
        let err = walk(&q, &path()).unwrap_err();
        assert!(err.to_string().starts_with("can't find match"));
        assert!(err.is_absent());

        let err: CoreError = err.into();
        assert_eq!(err.to_string(), "/libraries/lib.yaml:2:3: can't find match for path");
    }

    #[test]
    fn test_exact_segments_are_lazy() {
        let q = library("id: x\n");
        let walked = walk(&q, &[StringMatch::from("nope"), StringMatch::from("deeper")]).unwrap();
        assert!(walked.last_match.is_none());
    }

    #[test]
    fn test_walk_directories() {
        let fs = Arc::new(
            MemFs::new()
                .with_file("/a/x/config.yaml", "")
                .with_file("/a/y.yaml", ""),
        );
        let mut q = Query::new(fs);
        q.get("a");
        let walked = walk(&q, &[StringMatch::Any]).unwrap();
        assert_eq!(walked.last_match.as_deref(), Some("x"));
    }
}
