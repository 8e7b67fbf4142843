//! Pass 3': source attribute names and units, resources keyed by name.

use crate::kinds::{Access, Kind};
use tcc_core::{CoreError, CoreResult, format_duration, format_size};
use tcc_object::{Object, Value};
use tcc_transform::transformer::APPLICATIONS;
use tcc_transform::{Context, Transformer};

/// Re-key every child of `group` by its `name`, restoring the old key as
/// the `id` attribute
pub(crate) fn key_by_name(group: &Object<Value>) -> CoreResult<()> {
    let keyed = group.rekey(|_, child| child.get_string("name").map_err(CoreError::from))?;
    for (id, name) in &keyed {
        if let Some(object) = group.child_object(name) {
            object.set("id", id.as_str());
            object.delete("name");
        }
    }
    Ok(())
}

/// Inverse of [`Project`](crate::compile::normalize::Project)
pub struct Project;

impl Transformer for Project {
    fn process(&self, _ctx: &Context, project: Object<Value>) -> CoreResult<Object<Value>> {
        if let Some(applications) = project.child_object(APPLICATIONS) {
            key_by_name(&applications)?;
        }
        Ok(project)
    }

    fn name(&self) -> &str {
        "project"
    }
}

/// Inverse of [`Normalize`](crate::compile::normalize::Normalize)
pub struct Denormalize {
    kind: &'static Kind,
}

impl Denormalize {
    /// Inverse normalizer for `kind`
    #[must_use]
    pub fn new(kind: &'static Kind) -> Self {
        Self { kind }
    }

    fn resource(&self, resource: &Object<Value>) -> CoreResult<()> {
        for name in self.kind.sizes {
            unparse(resource, name, format_size)?;
        }
        for name in self.kind.durations {
            unparse(resource, name, format_duration)?;
        }

        if let Some(access) = self.kind.access {
            let (flag, when_set, otherwise) = match access {
                Access::Local => ("local", "host", "all"),
                Access::Public => ("public", "all", "host"),
            };
            if let Some(value) = resource.delete(flag) {
                let network = if value.as_bool() == Some(true) { when_set } else { otherwise };
                resource.set("network-access", network);
            }
        }

        if self.kind.trigger {
            if let Some(secure) = resource.delete("secure") {
                let kind = if secure.as_bool() == Some(true) { "https" } else { "http" };
                resource.set("type", kind);
            }
            if resource.has("service") {
                resource.move_attr("service", "p2p-protocol")?;
            }
        }

        for (from, to) in self.kind.renames {
            if resource.has(to) {
                resource.move_attr(to, from)?;
            }
        }
        Ok(())
    }
}

fn unparse(resource: &Object<Value>, name: &str, render: fn(u64) -> String) -> CoreResult<()> {
    match resource.get(name) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Int(n)) if n >= 0 => {
            resource.set(name, render(n.unsigned_abs()));
            Ok(())
        }
        Some(other) => Err(CoreError::Validation {
            field: name.to_string(),
            reason: format!("expected a non-negative integer, got {}", other),
        }),
    }
}

impl Transformer for Denormalize {
    fn process(&self, ctx: &Context, group: Object<Value>) -> CoreResult<Object<Value>> {
        for id in group.children() {
            ctx.check()?;
            let Some(resource) = group.child_object(&id) else {
                continue;
            };
            self.resource(&resource)
                .map_err(|err| CoreError::schema(format!("{}/{}: {}", self.kind.category, id, err)))?;
        }
        key_by_name(&group)?;
        Ok(group)
    }

    fn name(&self) -> &str {
        self.kind.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{DATABASES, FUNCTIONS, STORAGES};
    use tcc_transform::{global, sub};

    fn run(kind: &'static Kind, root: &Object<Value>) -> CoreResult<()> {
        global(sub(Denormalize::new(kind), kind.category)).process(&Context::new(), root.clone())?;
        Ok(())
    }

    #[test]
    fn test_function() {
        let root = Object::new();
        let f = root.create_path(&["functions", "QmFn1"]);
        f.set("name", "hello");
        f.set("secure", true);
        f.set("method", "GET");
        f.set("memory", 10_000_000i64);
        f.set("timeout", 5_000_000_000i64);

        run(&FUNCTIONS, &root).unwrap();
        let f = root.fetch(&["functions", "hello"]).unwrap();
        assert_eq!(f.get_string("id").unwrap(), "QmFn1");
        assert!(!f.has("name"));
        assert_eq!(f.get_string("type").unwrap(), "https");
        assert_eq!(f.get_string("http-method").unwrap(), "GET");
        assert_eq!(f.get_string("memory").unwrap(), "10MB");
        assert_eq!(f.get_string("timeout").unwrap(), "5s");
    }

    #[test]
    fn test_service_back_to_protocol() {
        let root = Object::new();
        let f = root.create_path(&["functions", "QmFn2"]);
        f.set("name", "ping");
        f.set("type", "p2p");
        f.set("service", "svc");
        f.set("command", "ping");

        run(&FUNCTIONS, &root).unwrap();
        let f = root.fetch(&["functions", "ping"]).unwrap();
        assert_eq!(f.get_string("p2p-protocol").unwrap(), "svc");
        assert_eq!(f.get_string("p2p-command").unwrap(), "ping");
        assert_eq!(f.get_string("type").unwrap(), "p2p");
    }

    #[test]
    fn test_access() {
        let root = Object::new();
        let db = root.create_path(&["databases", "QmDb1"]);
        db.set("name", "db");
        db.set("local", true);
        let s = root.create_path(&["storages", "QmS1"]);
        s.set("name", "s");
        s.set("public", false);

        run(&DATABASES, &root).unwrap();
        run(&STORAGES, &root).unwrap();
        let db = root.fetch(&["databases", "db"]).unwrap();
        assert_eq!(db.get_string("network-access").unwrap(), "host");
        assert!(!db.has("local"));
        assert_eq!(
            root.fetch(&["storages", "s"]).unwrap().get_string("network-access").unwrap(),
            "host"
        );
    }

    #[test]
    fn test_bad_size() {
        let root = Object::new();
        let db = root.create_path(&["databases", "QmDb1"]);
        db.set("name", "db");
        db.set("size", "big");
        let err = run(&DATABASES, &root).unwrap_err();
        assert!(err.to_string().contains("non-negative integer"), "{}", err);
    }

    #[test]
    fn test_name_equal_to_other_id() {
        let root = Object::new();
        root.create_path(&["functions", "b"]).set("name", "a");
        root.create_path(&["functions", "c"]).set("name", "b");

        run(&FUNCTIONS, &root).unwrap();
        let functions = root.child_object("functions").unwrap();
        assert_eq!(functions.children(), vec!["a", "b"]);
        assert_eq!(functions.fetch(&["a"]).unwrap().get_string("id").unwrap(), "b");
        assert_eq!(functions.fetch(&["b"]).unwrap().get_string("id").unwrap(), "c");
    }

    #[test]
    fn test_project_apps() {
        let root = Object::new();
        let app = root.create_path(&["applications", "QmApp1"]);
        app.set("name", "my-app");

        Project.process(&Context::new(), root.clone()).unwrap();
        let app = root.fetch(&["applications", "my-app"]).unwrap();
        assert_eq!(app.get_string("id").unwrap(), "QmApp1");
    }
}
