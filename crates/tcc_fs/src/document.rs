//! Parsed YAML documents and typed scalar extraction.
//!
//! Documents are parsed with `marked-yaml` so every node carries the
//! position it started at; that position becomes the [`Location`] of any
//! value read from it.

use crate::error::{FsError, FsResult};
use marked_yaml::Node;
use marked_yaml::types::MarkedScalarNode;
use tcc_core::Location;

/// A parsed document. `root` is `None` for empty documents.
#[derive(Debug)]
pub(crate) struct Document {
    path: String,
    root: Option<Node>,
}

/// Result of walking keys inside a document
pub(crate) enum Lookup<'a> {
    /// Node found, with its position
    Found(&'a Node, Location),
    /// A key (or the value itself) is absent; position of the deepest node reached
    Absent(Location),
    /// Walked into something that is not a mapping
    Mismatch(Location),
}

impl Document {
    pub(crate) fn parse(path: &str, bytes: &[u8]) -> FsResult<Self> {
        let invalid = || FsError::InvalidYaml {
            location: Location::in_file(path),
        };
        let text = std::str::from_utf8(bytes).map_err(|_| invalid())?;
        if is_blank(text) {
            return Ok(Self {
                path: path.to_string(),
                root: None,
            });
        }
        let root = marked_yaml::parse_yaml(0, text).map_err(|_| invalid())?;
        Ok(Self {
            path: path.to_string(),
            root: Some(root),
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn lookup(&self, keys: &[String]) -> Lookup<'_> {
        let Some(mut node) = self.root.as_ref() else {
            return Lookup::Absent(Location::in_file(&self.path));
        };
        let mut location = self.locate(node);

        for key in keys {
            match node {
                Node::Mapping(map) => match map.get_node(key) {
                    Some(next) => {
                        node = next;
                        location = self.locate(node);
                    }
                    None => return Lookup::Absent(location),
                },
                Node::Scalar(scalar) if is_null(scalar) => return Lookup::Absent(location),
                _ => return Lookup::Mismatch(location),
            }
        }

        match node {
            Node::Scalar(scalar) if is_null(scalar) => Lookup::Absent(location),
            _ => Lookup::Found(node, location),
        }
    }

    fn locate(&self, node: &Node) -> Location {
        match node.span().start() {
            Some(marker) => Location::new(&self.path, marker.line(), marker.column()),
            None => Location::in_file(&self.path),
        }
    }
}

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn is_null(scalar: &MarkedScalarNode) -> bool {
    matches!(scalar.as_str(), "" | "~" | "null" | "Null" | "NULL")
}

/// Keys of a mapping node in document order; `None` if the node is not a mapping
pub(crate) fn mapping_keys(node: &Node) -> Option<Vec<String>> {
    match node {
        Node::Mapping(map) => Some(map.keys().map(|k| k.as_str().to_string()).collect()),
        _ => None,
    }
}

/// A type that can be read out of a YAML node
pub trait FromNode: Sized {
    /// Convert, or `None` when the node has the wrong shape
    fn from_node(node: &Node) -> Option<Self>;
}

fn scalar(node: &Node) -> Option<&str> {
    node.as_scalar().map(MarkedScalarNode::as_str)
}

impl FromNode for String {
    fn from_node(node: &Node) -> Option<Self> {
        scalar(node).map(str::to_string)
    }
}

impl FromNode for bool {
    fn from_node(node: &Node) -> Option<Self> {
        match scalar(node)? {
            "true" | "True" | "TRUE" => Some(true),
            "false" | "False" | "FALSE" => Some(false),
            _ => None,
        }
    }
}

impl FromNode for i64 {
    fn from_node(node: &Node) -> Option<Self> {
        let text = scalar(node)?.trim();
        if let Ok(n) = text.parse::<i64>() {
            return Some(n);
        }
        let float = text.parse::<f64>().ok()?;
        if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
            Some(float as i64)
        } else {
            None
        }
    }
}

impl FromNode for f64 {
    fn from_node(node: &Node) -> Option<Self> {
        scalar(node)?.trim().parse().ok()
    }
}

impl FromNode for Vec<String> {
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Sequence(items) => items.iter().map(String::from_node).collect(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::parse("/d.yaml", text.as_bytes()).unwrap()
    }

    fn keys(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lookup_position() {
        let d = doc("id: QmD1\nfqdn: not valid fqdn!\n");
        match d.lookup(&keys(&["fqdn"])) {
            Lookup::Found(node, location) => {
                assert_eq!(String::from_node(node).unwrap(), "not valid fqdn!");
                assert_eq!(location, Location::new("/d.yaml", 2, 7));
            }
            _ => panic!("expected fqdn"),
        }
    }

    #[test]
    fn test_lookup_nested_and_missing() {
        let d = doc("trigger:\n  type: http\n  method: GET\n");
        assert!(matches!(d.lookup(&keys(&["trigger", "method"])), Lookup::Found(..)));
        match d.lookup(&keys(&["trigger", "paths"])) {
            Lookup::Absent(location) => assert_eq!(location.line, 2),
            _ => panic!("expected absent"),
        }
        assert!(matches!(
            d.lookup(&keys(&["trigger", "type", "x"])),
            Lookup::Mismatch(_)
        ));
    }

    #[test]
    fn test_null_is_absent() {
        let d = doc("a: ~\nb:\nc: null\n");
        for key in ["a", "b", "c"] {
            assert!(matches!(d.lookup(&keys(&[key])), Lookup::Absent(_)));
        }
    }

    #[test]
    fn test_empty_document() {
        let d = doc("# nothing\n---\n");
        assert!(d.is_empty());
        match d.lookup(&keys(&["id"])) {
            Lookup::Absent(location) => assert_eq!(location, Location::in_file("/d.yaml")),
            _ => panic!("expected absent"),
        }
    }

    #[test]
    fn test_invalid_document() {
        let err = Document::parse("/bad.yaml", b"id: [unclosed\n").unwrap_err();
        assert_eq!(
            err,
            FsError::InvalidYaml {
                location: Location::in_file("/bad.yaml")
            }
        );
    }

    #[test]
    fn test_typed_values() {
        let d = doc("n: 5\nf: 2.0\nh: 2.5\nb: true\nl: [a, b]\ns: {x: 1}\n");
        let get = |k: &str| match d.lookup(&keys(&[k])) {
            Lookup::Found(node, _) => node,
            _ => panic!("missing {}", k),
        };
        assert_eq!(i64::from_node(get("n")), Some(5));
        assert_eq!(i64::from_node(get("f")), Some(2));
        assert_eq!(i64::from_node(get("h")), None);
        assert_eq!(f64::from_node(get("h")), Some(2.5));
        assert_eq!(bool::from_node(get("b")), Some(true));
        assert_eq!(
            Vec::<String>::from_node(get("l")),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(String::from_node(get("s")), None);
        assert_eq!(mapping_keys(get("s")), Some(vec!["x".to_string()]));
    }
}
