//! Pass 1: canonical attribute names and units, resources keyed by id.

use crate::kinds::{Access, Kind};
use crate::paths::name_key;
use crate::scope::Scope;
use tcc_core::{CoreError, CoreResult, parse_duration, parse_size};
use tcc_object::{Object, Value};
use tcc_transform::transformer::APPLICATIONS;
use tcc_transform::{Context, NextValidation, Transformer};
use tracing::{debug, trace};

const PASS: &str = "normalize";

/// Re-key every child of `group` by its `id`, keeping the old key as the
/// `name` attribute. Returns the `(name, id)` pairs.
pub(crate) fn key_by_id(group: &Object<Value>) -> CoreResult<Vec<(String, String)>> {
    let keyed = group.rekey(|_, child| child.get_string("id").map_err(CoreError::from))?;
    for (name, id) in &keyed {
        if let Some(object) = group.child_object(id) {
            object.set("name", name.as_str());
            object.delete("id");
        }
    }
    Ok(keyed)
}

/// Project-level normalization: runs once on the root
pub struct Project;

impl Transformer for Project {
    fn process(&self, ctx: &Context, project: Object<Value>) -> CoreResult<Object<Value>> {
        project.delete("tags");
        let id = project.get_string("id")?;
        ctx.store().validations().push(NextValidation::project_id(&id));

        if let Some(applications) = project.child_object(APPLICATIONS) {
            for (name, app) in key_by_id(&applications)? {
                debug!(app = %name, id = %app, "application keyed by id");
            }
        }
        Ok(project)
    }

    fn name(&self) -> &str {
        "project"
    }
}

/// Per-category normalization, applied to a category group
pub struct Normalize {
    kind: &'static Kind,
}

impl Normalize {
    /// Normalizer for `kind`
    #[must_use]
    pub fn new(kind: &'static Kind) -> Self {
        Self { kind }
    }

    fn resource(&self, resource: &Object<Value>) -> CoreResult<()> {
        for (from, to) in self.kind.renames {
            if resource.has(from) {
                resource.move_attr(from, to)?;
            }
        }

        if let Some(access) = self.kind.access {
            let network = resource.delete("network-access");
            let network = network.as_ref().and_then(Value::as_str);
            match access {
                Access::Local => resource.set("local", network == Some("host")),
                Access::Public => resource.set("public", network == Some("all")),
            }
        }

        for name in self.kind.sizes {
            convert(resource, name, parse_size)?;
        }
        for name in self.kind.durations {
            convert(resource, name, parse_duration)?;
        }

        if self.kind.trigger {
            trigger(resource)?;
        }
        Ok(())
    }
}

fn convert(resource: &Object<Value>, name: &str, parse: fn(&str) -> CoreResult<u64>) -> CoreResult<()> {
    let text = match resource.get(name) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Str(text)) => text,
        Some(other) => {
            return Err(CoreError::Validation {
                field: name.to_string(),
                reason: format!("expected a string, got {}", other.kind()),
            });
        }
    };
    let parsed = parse(&text)?;
    let parsed = i64::try_from(parsed).map_err(|_| CoreError::Validation {
        field: name.to_string(),
        reason: format!("`{}` is too large", text),
    })?;
    resource.set(name, parsed);
    Ok(())
}

fn trigger(resource: &Object<Value>) -> CoreResult<()> {
    let kind = resource.get("type");
    match kind.as_ref().and_then(Value::as_str) {
        Some("http") => {
            resource.set("secure", false);
            resource.delete("type");
        }
        Some("https") => {
            resource.set("secure", true);
            resource.delete("type");
        }
        _ => {}
    }

    if kind.as_ref().and_then(Value::as_str) == Some("p2p") {
        if resource.has("p2p-protocol") {
            resource.move_attr("p2p-protocol", "service")?;
        }
    } else {
        resource.delete("p2p-protocol");
    }
    Ok(())
}

impl Transformer for Normalize {
    fn process(&self, ctx: &Context, group: Object<Value>) -> CoreResult<Object<Value>> {
        let scope = Scope::of(ctx, PASS)?;
        let app = scope.app_key();
        let category = self.kind.category;

        for name in group.children() {
            ctx.check()?;
            let Some(resource) = group.child_object(&name) else {
                continue;
            };
            self.resource(&resource)
                .map_err(|err| CoreError::schema(format!("{}/{}: {}", category, name, err)))?;
        }

        for (name, id) in key_by_id(&group)? {
            if let Some(previous) = ctx.store().strings().set(name_key(app, category, &name), id.clone()) {
                return Err(CoreError::AlreadyExists {
                    what: format!("{} `{}` (ids {} and {})", category, name, previous, id),
                });
            }
            trace!(category, name = %name, id = %id, "resource keyed by id");
        }
        Ok(group)
    }

    fn name(&self) -> &str {
        self.kind.category
    }
}
