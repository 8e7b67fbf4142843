//! Pass 2: names that reference other resources become ids.

use crate::kinds::{DOMAINS, Kind, LIBRARIES};
use crate::paths::name_key;
use crate::scope::Scope;
use tcc_core::{CoreError, CoreResult};
use tcc_object::{Object, Value};
use tcc_transform::{Context, Transformer};

const PASS: &str = "resolve";

/// Prefix of a `source` naming a library
pub const LIBRARY_SOURCE: &str = "libraries/";

/// Id of `name` in `category`, looked up in the application first
fn lookup(ctx: &Context, app: Option<&str>, category: &str, name: &str) -> CoreResult<String> {
    let strings = ctx.store().strings();
    app.and_then(|app| strings.get(&name_key(Some(app), category, name)))
        .or_else(|| strings.get(&name_key(None, category, name)))
        .ok_or_else(|| CoreError::reference(category, name))
}

/// Rewrites `domains` and library `source` references of a category group
pub struct Resolve {
    kind: &'static Kind,
}

impl Resolve {
    /// Resolver for `kind`
    #[must_use]
    pub fn new(kind: &'static Kind) -> Self {
        Self { kind }
    }
}

impl Transformer for Resolve {
    fn process(&self, ctx: &Context, group: Object<Value>) -> CoreResult<Object<Value>> {
        let scope = Scope::of(ctx, PASS)?;
        let app = scope.app_key();

        for id in group.children() {
            ctx.check()?;
            let Some(resource) = group.child_object(&id) else {
                continue;
            };

            if self.kind.http && resource.has("domains") {
                let ids = resource
                    .get_list("domains")?
                    .iter()
                    .map(|name| lookup(ctx, app, DOMAINS.category, name))
                    .collect::<CoreResult<Vec<_>>>()?;
                resource.set("domains", ids);
            }

            if self.kind.trigger {
                if let Some(Value::Str(source)) = resource.get("source") {
                    if let Some(library) = source.strip_prefix(LIBRARY_SOURCE) {
                        let id = lookup(ctx, app, LIBRARIES.category, library)?;
                        resource.set("source", format!("{}{}", LIBRARY_SOURCE, id));
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
