//! Pass 2': ids that reference other resources become names again.

use crate::compile::resolve::LIBRARY_SOURCE;
use crate::kinds::{DOMAINS, Kind, LIBRARIES};
use crate::scope::Scope;
use tcc_core::{CoreError, CoreResult};
use tcc_object::{Object, Value};
use tcc_transform::{Context, Transformer};

const PASS: &str = "unresolve";

/// Name of the resource `id` in `category`, application scope first
fn name_of(scope: &Scope, category: &str, id: &str) -> CoreResult<String> {
    scope
        .owners()
        .iter()
        .filter_map(|owner| owner.child_object(category)?.child_object(id))
        .find_map(|resource| resource.get_string("name").ok())
        .ok_or_else(|| CoreError::reference(category, id))
}

/// Inverse of [`Resolve`](crate::compile::resolve::Resolve)
pub struct Unresolve {
    kind: &'static Kind,
}

impl Unresolve {
    /// Inverse resolver for `kind`
    #[must_use]
    pub fn new(kind: &'static Kind) -> Self {
        Self { kind }
    }
}

impl Transformer for Unresolve {
    fn process(&self, ctx: &Context, group: Object<Value>) -> CoreResult<Object<Value>> {
        let scope = Scope::of(ctx, PASS)?;

        for id in group.children() {
            ctx.check()?;
            let Some(resource) = group.child_object(&id) else {
                continue;
            };

            if self.kind.http && resource.has("domains") {
                let names = resource
                    .get_list("domains")?
                    .iter()
                    .map(|domain| name_of(&scope, DOMAINS.category, domain))
                    .collect::<CoreResult<Vec<_>>>()?;
                resource.set("domains", names);
            }

            if self.kind.trigger {
                if let Some(Value::Str(source)) = resource.get("source") {
                    if let Some(library) = source.strip_prefix(LIBRARY_SOURCE) {
                        let name = name_of(&scope, LIBRARIES.category, library)?;
                        resource.set("source", format!("{}{}", LIBRARY_SOURCE, name));
                    }
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
    use crate::kinds::FUNCTIONS;
    use tcc_transform::{global, sub};

    #[test]
    fn test_domains_and_source() {
        let root = Object::new();
        root.create_path(&["domains", "QmDom1"]).set("name", "global-d");
        root.create_path(&["libraries", "QmLib1"]).set("name", "lib");
        let app = root.create_path(&["applications", "QmApp1"]);
        app.create_path(&["domains", "QmDom2"]).set("name", "local-d");
        let f = app.create_path(&["functions", "QmFn1"]);
        f.set("domains", vec!["QmDom2".to_string(), "QmDom1".to_string()]);
        f.set("source", "libraries/QmLib1");

        global(sub(Unresolve::new(&FUNCTIONS), "functions"))
            .process(&Context::new(), root.clone())
            .unwrap();
        assert_eq!(f.get_list("domains").unwrap(), vec!["local-d", "global-d"]);
        assert_eq!(f.get_string("source").unwrap(), "libraries/lib");
    }

    #[test]
    fn test_unknown_id() {
        let root = Object::new();
        root.create_path(&["functions", "QmFn1"]).set("domains", vec!["QmX".to_string()]);
        let err = global(sub(Unresolve::new(&FUNCTIONS), "functions"))
            .process(&Context::new(), root)
            .unwrap_err();
        assert_eq!(err, CoreError::reference("domains", "QmX"));
    }
}
