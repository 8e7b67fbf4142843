//! Child name matching.

use crate::error::{ObjectError, ObjectResult};
use regex::Regex;
use std::collections::HashMap;

/// How a child name is compared against an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Whole name equals the expression
    Exact,
    /// Name starts with the expression
    Prefix,
    /// Name ends with the expression
    Suffix,
    /// Name contains the expression
    Contains,
    /// Name matches the expression as a regular expression
    RegEx,
}

impl MatchMode {
    /// Plain-text test; `RegEx` always answers `false` here
    #[must_use]
    pub fn accepts(self, expr: &str, name: &str) -> bool {
        match self {
            Self::Exact => name == expr,
            Self::Prefix => name.starts_with(expr),
            Self::Suffix => name.ends_with(expr),
            Self::Contains => name.contains(expr),
            Self::RegEx => false,
        }
    }
}

/// Per-object memo of compiled patterns
#[derive(Debug, Default)]
pub(crate) struct RegexCache {
    compiled: HashMap<String, Regex>,
}

impl RegexCache {
    pub(crate) fn get_or_compile(&mut self, pattern: &str) -> ObjectResult<Regex> {
        if let Some(regex) = self.compiled.get(pattern) {
            return Ok(regex.clone());
        }
        let regex = Regex::new(pattern).map_err(|e| ObjectError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.compiled.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    pub(crate) fn len(&self) -> usize {
        self.compiled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts() {
        assert!(MatchMode::Exact.accepts("a", "a"));
        assert!(!MatchMode::Exact.accepts("a", "ab"));
        assert!(MatchMode::Prefix.accepts("a", "ab"));
        assert!(MatchMode::Suffix.accepts("b", "ab"));
        assert!(MatchMode::Contains.accepts("b", "abc"));
        assert!(!MatchMode::RegEx.accepts(".*", "abc"));
    }

    #[test]
    fn test_cache_reuses() {
        let mut cache = RegexCache::default();
        let a = cache.get_or_compile("^x").unwrap();
        let b = cache.get_or_compile("^x").unwrap();
        assert_eq!(a.as_str(), b.as_str());
        assert_eq!(cache.len(), 1);
    }
}
