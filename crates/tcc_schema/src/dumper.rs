//! Object tree to filesystem.

use crate::attribute::Attribute;
use crate::matcher::StringMatch;
use crate::node::Node;
use tcc_core::{CoreError, CoreResult};
use tcc_fs::Query;
use tcc_object::{Object, Value};
use tracing::trace;

const CONFIG: &str = "config";

/// Stage the files for `object`, described by `node`, at `cursor`
///
/// Writes are only staged; the caller syncs.
///
/// # Errors
///
/// Returns an error if a branch cannot be resolved
pub fn dump_node(node: &Node, object: &Object<Value>, cursor: &Query) -> CoreResult<()> {
    if !node.is_group() {
        let mut document = cursor.fork();
        document.document();
        document.touch()?;
        return dump_attributes(node, object, &document);
    }

    if !node.attributes.is_empty() {
        let mut config = cursor.fork();
        config.get(CONFIG).document();
        config.touch()?;
        dump_attributes(node, object, &config)?;
    }

    for name in object.children() {
        let Some(child_node) = node.find_child(&name) else {
            trace!(name = %name, "no schema node, not dumped");
            continue;
        };
        let Some(child) = object.child_object(&name) else {
            continue;
        };
        let mut next = cursor.fork();
        next.get(&name);
        dump_node(child_node, &child, &next)?;
    }
    Ok(())
}

/// Stage every attribute of `object` into the document at `document`
///
/// # Errors
///
/// Returns `can't resolve branch for '<attr>'` for ambiguous paths
pub fn dump_attributes(node: &Node, object: &Object<Value>, document: &Query) -> CoreResult<()> {
    for attribute in &node.attributes {
        let Some(value) = object.get(&attribute.name) else {
            continue;
        };
        if value.is_null() || attribute.is_default(&value) {
            continue;
        }

        let path = resolve_path(node, attribute, object, &value)?;
        let mut cursor = document.fork();
        for segment in &path {
            cursor.get(segment);
        }

        if attribute.key {
            cursor.touch()?;
            continue;
        }
        match to_yaml(&value) {
            Some(yaml) => cursor.set(yaml)?,
            None => trace!(attribute = %attribute.name, "nested object not dumped"),
        }
    }
    Ok(())
}

fn resolve_path(
    node: &Node,
    attribute: &Attribute,
    object: &Object<Value>,
    value: &Value,
) -> CoreResult<Vec<String>> {
    attribute
        .effective_path()
        .iter()
        .map(|segment| match segment {
            StringMatch::Exact(name) => Ok(name.clone()),
            matcher => branch(node, attribute, object, value, matcher)
                .ok_or_else(|| CoreError::schema(format!("can't resolve branch for '{}'", attribute.name))),
        })
        .collect()
}

/// Pick the name to write for a matcher segment: the key value itself for
/// key attributes; otherwise the object's `type`, then a key attribute of the
/// same node, then the only option.
fn branch(
    node: &Node,
    attribute: &Attribute,
    object: &Object<Value>,
    value: &Value,
    matcher: &StringMatch,
) -> Option<String> {
    let accepted = |candidate: Option<String>| candidate.filter(|c| matcher.accepts(c));

    if attribute.key {
        return accepted(value.as_str().map(str::to_string));
    }
    if let Some(name) = accepted(object.get_string("type").ok()) {
        return Some(name);
    }
    let from_key = node
        .attributes
        .iter()
        .filter(|a| a.key && a.name != attribute.name)
        .find_map(|a| accepted(object.get_string(&a.name).ok()));
    if from_key.is_some() {
        return from_key;
    }
    match matcher {
        StringMatch::OneOf(options) if options.len() == 1 => Some(options[0].clone()),
        _ => None,
    }
}

fn to_yaml(value: &Value) -> Option<serde_yaml::Value> {
    Some(match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Int(n) => serde_yaml::Value::from(*n),
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Float(x) => serde_yaml::Value::from(*x),
        Value::Str(s) => serde_yaml::Value::String(s.clone()),
        Value::List(items) => serde_yaml::Value::Sequence(
            items
                .iter()
                .map(|s| serde_yaml::Value::String(s.clone()))
                .collect(),
        ),
        Value::Obj(_) => return None,
    })
}
