//! Deferred external validations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Validator name for project id ownership
pub const PROJECT_ID: &str = "project_id";

/// Validator name for DNS ownership
pub const DNS: &str = "dns";

/// A check the compiler cannot do itself, left for the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextValidation {
    /// Logical field (`project_id`, `domain`)
    pub key: String,
    /// Field value
    pub value: String,
    /// External system that checks it (`project_id`, `dns`)
    pub validator: String,
    /// Labels: `project`, and `app` when inside an application
    pub context: IndexMap<String, String>,
}

impl NextValidation {
    /// Create a validation with an empty context
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>, validator: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            validator: validator.into(),
            context: IndexMap::new(),
        }
    }

    /// Add a context label
    #[must_use]
    pub fn with_context(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(label.into(), value.into());
        self
    }

    /// Project id equality check
    #[must_use]
    pub fn project_id(project: &str) -> Self {
        Self::new(PROJECT_ID, project, PROJECT_ID).with_context("project", project)
    }

    /// DNS ownership check for a domain
    #[must_use]
    pub fn dns(fqdn: &str, project: &str, app: Option<&str>) -> Self {
        let validation = Self::new("domain", fqdn, DNS).with_context("project", project);
        match app {
            Some(app) => validation.with_context("app", app),
            None => validation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dns_context() {
        let v = NextValidation::dns("example.com", "QmProj1", Some("QmApp1"));
        assert_eq!(v.validator, DNS);
        assert_eq!(v.key, "domain");
        assert_eq!(v.context.get("app").map(String::as_str), Some("QmApp1"));

        let v = NextValidation::dns("example.com", "QmProj1", None);
        assert!(!v.context.contains_key("app"));
    }

    #[test]
    fn test_serde() {
        let v = NextValidation::project_id("QmProj1");
        let json = serde_json::to_string(&v).unwrap();
        let back: NextValidation = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
