//! Schema engine entry points.

use crate::dumper::dump_node;
use crate::loader::load_node;
use crate::node::Node;
use tcc_core::CoreResult;
use tcc_fs::Query;
use tcc_object::{Object, Value};
use tracing::debug;

/// Loads and dumps source trees shaped by a root [`Node`]
#[derive(Debug, Clone)]
pub struct Engine {
    root: Node,
}

impl Engine {
    /// Create an engine for `root`
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Root schema node
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Read the tree at `query` into a fresh object
    ///
    /// # Errors
    ///
    /// Returns the first located error encountered
    pub fn load(&self, query: &Query) -> CoreResult<Object<Value>> {
        debug!(path = %query.path(), "loading source tree");
        let object = Object::new();
        load_node(&self.root, query, &object)?;
        Ok(object)
    }

    /// Write `object` as files at `query` and sync them
    ///
    /// # Errors
    ///
    /// Returns a branch resolution or filesystem error
    pub fn dump(&self, object: &Object<Value>, query: &Query) -> CoreResult<()> {
        debug!(path = %query.path(), "dumping source tree");
        dump_node(&self.root, object, query)?;
        query.sync()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::Attribute;
    use crate::matcher::{StringMatch, either};
    use std::sync::Arc;
    use tcc_fs::{Filesystem, MemFs};

    fn schema() -> Node {
        let resource = || {
            Node::leaf(StringMatch::Any).with_attributes([
                Attribute::string("id").required(),
                Attribute::string("provider")
                    .key()
                    .with_path([StringMatch::from("source"), either(&["github", "gitlab"])]),
                Attribute::string("fullname").with_path([
                    StringMatch::from("source"),
                    either(&["github", "gitlab"]),
                    StringMatch::from("fullname"),
                ]),
                Attribute::int("replicas").with_default(1i64),
                Attribute::list("tags"),
            ])
        };
        Node::group("root")
            .with_attribute(Attribute::string("id").required())
            .with_attribute(Attribute::string("email").with_path(["notification", "email"]))
            .with_child(Node::group("libraries").with_child(resource()))
            .with_child(
                Node::group("applications").with_child(
                    Node::group(StringMatch::Any)
                        .with_attribute(Attribute::string("id").required())
                        .with_child(Node::group("libraries").with_child(resource())),
                ),
            )
    }

    fn source() -> Arc<MemFs> {
        Arc::new(
            MemFs::new()
                .with_file("/config.yaml", "id: QmProj1\nnotification:\n  email: a@b.c\n")
                .with_file(
                    "/libraries/l.yaml",
                    "id: QmL1\nsource:\n  gitlab:\n    fullname: org/l\ntags: [x, y]\n",
                )
                .with_file("/applications/app/config.yaml", "id: QmApp1\n")
                .with_file("/applications/app/libraries/m.yaml", "id: QmL2\nreplicas: 3\n"),
        )
    }

    #[test]
    fn test_load() {
        let engine = Engine::new(schema());
        let root = engine.load(&Query::new(source())).unwrap();

        assert_eq!(root.get_string("email").unwrap(), "a@b.c");
        let l = root.fetch(&["libraries", "l"]).unwrap();
        assert_eq!(l.get_string("provider").unwrap(), "gitlab");
        assert_eq!(l.get_string("fullname").unwrap(), "org/l");
        assert_eq!(l.get_int("replicas").unwrap(), 1);
        assert_eq!(l.get_list("tags").unwrap(), vec!["x", "y"]);

        let m = root.fetch(&["applications", "app", "libraries", "m"]).unwrap();
        assert_eq!(m.get_int("replicas").unwrap(), 3);
    }

    #[test]
    fn test_dump_then_load_is_identity() {
        let engine = Engine::new(schema());
        let root = engine.load(&Query::new(source())).unwrap();

        let target = Arc::new(MemFs::new());
        engine.dump(&root, &Query::new(target.clone())).unwrap();
        let again = engine.load(&Query::new(target.clone())).unwrap();

        assert!(root.deep_eq(&again));
        assert!(target.is_file("/applications/app/config.yaml"));
        assert!(
            !target
                .read_to_string("/libraries/l.yaml")
                .unwrap()
                .contains("replicas")
        );
    }
}
