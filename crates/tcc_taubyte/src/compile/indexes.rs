//! Pass 4: lookup indexes and deferred validations.
//!
//! Indexes are flat: each attribute of the `indexes` object is a full
//! `/`-joined key holding a list of naming-service paths (or `Null` for a
//! key that must exist but has no entries yet).

use crate::kinds::{DOMAINS, Kind, Links};
use crate::paths;
use crate::scope::Scope;
use tcc_core::{CoreError, CoreResult, Hash};
use tcc_object::{Object, Value};
use tcc_transform::{Context, NextValidation, Transformer};
use tracing::trace;

const PASS: &str = "indexes";

/// Child of the compiled root, and store key, of the index object
pub const INDEXES: &str = "indexes";

/// Create the index object and register it in the store
///
/// # Errors
///
/// Never fails; the signature matches the transformer closure shape
pub fn prepare(ctx: &Context, root: Object<Value>) -> CoreResult<Object<Value>> {
    let indexes = root.create_path(&[INDEXES]);
    ctx.store().objects().set(INDEXES, indexes);
    Ok(root)
}

/// Append `link` to the list at `key`, once
///
/// # Errors
///
/// Returns `WrongType` if `key` holds something other than a list or `Null`
pub fn append(indexes: &Object<Value>, key: &str, link: &str) -> CoreResult<()> {
    let mut links = if indexes.has(key) {
        indexes.get_list(key)?
    } else {
        Vec::new()
    };
    if !links.iter().any(|l| l == link) {
        links.push(link.to_string());
    }
    indexes.set(key, links);
    Ok(())
}

fn ensure(indexes: &Object<Value>, key: &str) {
    if !indexes.has(key) {
        indexes.set(key, Value::Null);
    }
}

fn string_or_empty(resource: &Object<Value>, name: &str) -> String {
    match resource.get(name) {
        Some(Value::Str(s)) => s,
        _ => String::new(),
    }
}

/// Emits the index entries of one category group
pub struct Indexer {
    kind: &'static Kind,
    branch: String,
}

impl Indexer {
    /// Indexer for `kind` on `branch`
    #[must_use]
    pub fn new(kind: &'static Kind, branch: impl Into<String>) -> Self {
        Self {
            kind,
            branch: branch.into(),
        }
    }

    fn fqdn(scope: &Scope, id: &str) -> CoreResult<String> {
        scope
            .owners()
            .iter()
            .filter_map(|owner| owner.child_object(DOMAINS.category)?.child_object(id))
            .find_map(|domain| domain.get_string("fqdn").ok())
            .ok_or_else(|| CoreError::reference(DOMAINS.category, id))
    }
}

impl Transformer for Indexer {
    fn process(&self, ctx: &Context, group: Object<Value>) -> CoreResult<Object<Value>> {
        let scope = Scope::of(ctx, PASS)?;
        let project = scope.project_id()?;
        let app = scope.app_key();
        let indexes = ctx
            .store()
            .objects()
            .get(INDEXES)
            .ok_or_else(|| CoreError::pipeline(PASS, "index object not prepared"))?;
        let category = self.kind.category;

        for id in group.children() {
            ctx.check()?;
            let Some(resource) = group.child_object(&id) else {
                continue;
            };
            let tns = paths::tns_path(&project, &self.branch, app, category, &id);

            match self.kind.links {
                Links::Name => {
                    let name = resource.get_string("name")?;
                    append(&indexes, &paths::name_links(&project, app, category, &name), &tns)?;
                }
                Links::Domain => {
                    let fqdn = resource.get_string("fqdn")?;
                    append(&indexes, &paths::domain_links(&fqdn), &tns)?;
                    ensure(&indexes, &paths::http_links(&fqdn));

                    let app_name = match &scope.app {
                        Some((_, app)) => Some(app.get_string("name")?),
                        None => None,
                    };
                    ctx.store()
                        .validations()
                        .push(NextValidation::dns(&fqdn, &project, app_name.as_deref()));
                }
                Links::Messaging => {
                    let channel = string_or_empty(&resource, "match");
                    let hash = Hash::of_parts(&[project.as_str(), app.unwrap_or(""), channel.as_str()]).to_hex();
                    append(&indexes, &paths::messaging_links(&hash), &tns)?;
                }
            }

            if self.kind.http && resource.has("domains") {
                for domain in resource.get_list("domains")? {
                    let fqdn = Self::fqdn(&scope, &domain)?;
                    append(&indexes, &paths::http_links(&fqdn), &tns)?;
                }
            }

            if let Some(kind) = self.kind.repository {
                let provider = string_or_empty(&resource, "git-provider");
                let repository = string_or_empty(&resource, "repository-id");
                if provider.is_empty() || repository.is_empty() {
                    trace!(category, id = %id, "no repository, skipping");
                } else {
                    let base = paths::repository(&provider, &repository, &project);
                    indexes.set(format!("{}/type", base), kind);
                    indexes.set(format!("{}/resource", base), tns.as_str());
                }
            }
        }
        Ok(group)
    }

    fn name(&self) -> &str {
        self.kind.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{FUNCTIONS, LIBRARIES, MESSAGING};
    use proptest::prelude::*;
    use tcc_transform::{global, sub};

    fn compiled() -> (Object<Value>, Object<Value>) {
        let root = Object::new();
        let project = root.create_path(&["object"]);
        project.set("id", "QmProj1");
        (root, project)
    }

    fn run(kind: &'static Kind, root: &Object<Value>) -> CoreResult<Context> {
        let ctx = Context::new();
        prepare(&ctx, root.clone())?;
        sub(global(sub(Indexer::new(kind, "main"), kind.category)), "object")
            .process(&ctx, root.clone())?;
        Ok(ctx)
    }

    #[test]
    fn test_function_links() {
        let (root, project) = compiled();
        let domain = project.create_path(&["domains", "QmDom1"]);
        domain.set("name", "d");
        domain.set("fqdn", "example.com");
        let f = project.create_path(&["functions", "QmFn1"]);
        f.set("name", "hello");
        f.set("domains", vec!["QmDom1".to_string()]);

        run(&FUNCTIONS, &root).unwrap();
        let indexes = root.child_object(INDEXES).unwrap();
        let tns = "projects/QmProj1/branches/main/functions/QmFn1";
        assert_eq!(
            indexes.get_list("projects/QmProj1/functions/hello/versioning/links").unwrap(),
            vec![tns]
        );
        assert_eq!(indexes.get_list("http/com/example/links").unwrap(), vec![tns]);
    }

    #[test]
    fn test_app_function_uses_project_domain() {
        let (root, project) = compiled();
        project.create_path(&["domains", "QmDom1"]).set("fqdn", "example.com");
        let app = project.create_path(&["applications", "QmApp1"]);
        app.set("name", "my-app");
        let f = app.create_path(&["functions", "QmFn1"]);
        f.set("name", "hello");
        f.set("domains", vec!["QmDom1".to_string()]);

        run(&FUNCTIONS, &root).unwrap();
        let indexes = root.child_object(INDEXES).unwrap();
        assert_eq!(
            indexes.get_list("http/com/example/links").unwrap(),
            vec!["projects/QmProj1/branches/main/applications/QmApp1/functions/QmFn1"]
        );
        assert!(indexes.has("projects/QmProj1/applications/QmApp1/functions/hello/versioning/links"));
    }

    #[test]
    fn test_unknown_domain_id() {
        let (root, project) = compiled();
        let f = project.create_path(&["functions", "QmFn1"]);
        f.set("name", "hello");
        f.set("domains", vec!["QmNope".to_string()]);
        assert_eq!(
            run(&FUNCTIONS, &root).unwrap_err(),
            CoreError::reference("domains", "QmNope")
        );
    }

    #[test]
    fn test_domain_validation_and_http_key() {
        let (root, project) = compiled();
        let app = project.create_path(&["applications", "QmApp1"]);
        app.set("name", "my-app");
        let d = app.create_path(&["domains", "QmDom1"]);
        d.set("name", "d");
        d.set("fqdn", "www.example.com");

        let ctx = run(&DOMAINS, &root).unwrap();
        let indexes = root.child_object(INDEXES).unwrap();
        assert_eq!(
            indexes.get_list("domains/com/example/www/versioning/links").unwrap(),
            vec!["projects/QmProj1/branches/main/applications/QmApp1/domains/QmDom1"]
        );
        assert!(indexes.get("http/com/example/www/links").unwrap().is_null());

        let validations = ctx.store().validations().get();
        assert_eq!(validations.len(), 1);
        assert_eq!(validations[0].value, "www.example.com");
        assert_eq!(validations[0].context.get("app").map(String::as_str), Some("my-app"));
    }

    #[test]
    fn test_messaging_hash() {
        let (root, project) = compiled();
        let m = project.create_path(&["messaging", "QmMsg1"]);
        m.set("name", "chat");
        m.set("match", "room");

        run(&MESSAGING, &root).unwrap();
        let hash = Hash::of_parts(&["QmProj1", "", "room"]).to_hex();
        let indexes = root.child_object(INDEXES).unwrap();
        assert!(indexes.has(&format!("messaging/{}/versioning/links", hash)));
    }

    #[test]
    fn test_repository_entries() {
        let (root, project) = compiled();
        let lib = project.create_path(&["libraries", "QmLib1"]);
        lib.set("name", "lib");
        lib.set("git-provider", "github");
        lib.set("repository-id", "42");

        run(&LIBRARIES, &root).unwrap();
        let indexes = root.child_object(INDEXES).unwrap();
        let base = "repositories/github/42/projects/QmProj1";
        assert_eq!(indexes.get_string(&format!("{}/type", base)).unwrap(), "library");
        assert_eq!(
            indexes.get_string(&format!("{}/resource", base)).unwrap(),
            "projects/QmProj1/branches/main/libraries/QmLib1"
        );
    }

    #[test]
    fn test_append_null() {
        let indexes = Object::new();
        indexes.set("k", Value::Null);
        append(&indexes, "k", "a").unwrap();
        assert_eq!(indexes.get_list("k").unwrap(), vec!["a"]);

        indexes.set("s", "scalar");
        assert!(append(&indexes, "s", "a").is_err());
    }

    proptest! {
        #[test]
        fn prop_append_dedups(links in proptest::collection::vec("[a-c]{1,2}", 0..24)) {
            let indexes = Object::new();
            for link in &links {
                append(&indexes, "k", link).unwrap();
            }
            let mut expected = links.clone();
            expected.sort();
            expected.dedup();

            let mut stored = if links.is_empty() { Vec::new() } else { indexes.get_list("k").unwrap() };
            let first_seen: Vec<String> = links
                .iter()
                .fold(Vec::new(), |mut seen: Vec<String>, l| {
                    if !seen.contains(l) {
                        seen.push(l.clone());
                    }
                    seen
                });
            prop_assert_eq!(&stored, &first_seen);
            stored.sort();
            prop_assert_eq!(stored, expected);
        }
    }
}
