//! Schema nodes.

use crate::attribute::Attribute;
use crate::matcher::StringMatch;

/// A group (directory) or leaf (document) in the source tree
#[derive(Debug, Clone)]
pub struct Node {
    /// Which on-disk names this node describes
    pub matcher: StringMatch,
    /// Attributes; for groups they live in `config.yaml`
    pub attributes: Vec<Attribute>,
    /// Child nodes, tried in order; always empty for leaves
    pub children: Vec<Node>,
    group: bool,
}

impl Node {
    /// A directory node
    #[must_use]
    pub fn group(matcher: impl Into<StringMatch>) -> Self {
        Self {
            matcher: matcher.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            group: true,
        }
    }

    /// A document node
    #[must_use]
    pub fn leaf(matcher: impl Into<StringMatch>) -> Self {
        Self {
            group: false,
            ..Self::group(matcher)
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add several attributes
    #[must_use]
    pub fn with_attributes(mut self, attributes: impl IntoIterator<Item = Attribute>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    /// Add a child node; ignored on leaves
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        if self.group {
            self.children.push(child);
        }
        self
    }

    /// Add several child nodes
    #[must_use]
    pub fn with_children(self, children: impl IntoIterator<Item = Node>) -> Self {
        children.into_iter().fold(self, Node::with_child)
    }

    /// Whether this is a group
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.group
    }

    /// Whether any attribute is required
    #[must_use]
    pub fn has_required(&self) -> bool {
        self.attributes.iter().any(|a| a.required)
    }

    /// First child node accepting `name`
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.matcher.accepts(name))
    }

    /// Attribute by name
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
