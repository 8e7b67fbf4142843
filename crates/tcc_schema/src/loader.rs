//! Filesystem to object tree.

use crate::attribute::{AttrType, Attribute};
use crate::matcher::StringMatch;
use crate::node::Node;
use crate::walk::{WalkError, walk};
use tcc_core::{CoreError, CoreResult, Location};
use tcc_fs::{FsError, Query};
use tcc_object::{Object, Value};
use tracing::trace;

const CONFIG: &str = "config";

/// Fill `object` from the entry at `cursor` described by `node`
///
/// # Errors
///
/// Returns the first located attribute or filesystem error
pub fn load_node(node: &Node, cursor: &Query, object: &Object<Value>) -> CoreResult<()> {
    if !node.is_group() {
        let mut document = cursor.fork();
        document.document();
        return load_attributes(node, &document, object);
    }

    if !node.attributes.is_empty() {
        let mut config = cursor.fork();
        config.get(CONFIG).document();
        if let Err(err) = load_attributes(node, &config, object) {
            if node.has_required() {
                return Err(err);
            }
            trace!(path = %config.path(), error = %err, "ignoring group config");
        }
    }

    let names = match cursor.fork().list() {
        Ok(names) => names,
        Err(FsError::NotFound { .. }) => return Ok(()),
        Err(err) => return Err(err.into()),
    };

    for name in names.iter().filter(|n| n.as_str() != CONFIG) {
        let Some(child) = node.find_child(name) else {
            trace!(name = %name, "no schema node, skipping");
            continue;
        };
        let mut next = cursor.fork();
        next.get(name);
        load_node(child, &next, &object.create_path(&[name]))?;
    }
    Ok(())
}

/// Load every attribute of `node` from the document at `document`
///
/// # Errors
///
/// Returns the first attribute error
pub fn load_attributes(node: &Node, document: &Query, object: &Object<Value>) -> CoreResult<()> {
    for attribute in &node.attributes {
        load_attribute(attribute, document, object)?;
    }
    Ok(())
}

enum Outcome {
    Found(Value, Location),
    Absent(Location),
}

/// Resolve one attribute and store it on `object`
///
/// # Errors
///
/// Returns `required attribute '<name>'`, a validator message or a
/// structural error, each prefixed with the source location
pub fn load_attribute(attribute: &Attribute, document: &Query, object: &Object<Value>) -> CoreResult<()> {
    let mut outcome = attempt(attribute, document, &attribute.effective_path());
    if matches!(outcome, Ok(Outcome::Absent(_))) && !attribute.compat.is_empty() {
        if let Ok(found @ Outcome::Found(..)) = attempt(attribute, document, &attribute.compat) {
            outcome = Ok(found);
        }
    }

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) if attribute.required && is_read_failure(&err) => {
            return Err(required(&absent_at(document, &err), attribute));
        }
        Err(err) => return Err(err.into()),
    };

    match outcome {
        Outcome::Found(value, location) => {
            attribute
                .validate(&value)
                .map_err(|message| CoreError::located(location, message))?;
            object.set(attribute.name.clone(), value);
        }
        Outcome::Absent(location) => {
            if attribute.required {
                return Err(required(&location, attribute));
            }
            if let Some(default) = &attribute.default {
                object.set(attribute.name.clone(), default.clone());
            }
        }
    }
    Ok(())
}

fn required(location: &Location, attribute: &Attribute) -> CoreError {
    CoreError::located(
        location.clone(),
        format!("required attribute '{}'", attribute.name),
    )
}

fn is_read_failure(err: &FsError) -> bool {
    matches!(err, FsError::Structure { .. })
}

fn absent_at(document: &Query, err: &FsError) -> Location {
    err.location().cloned().unwrap_or_else(|| {
        document
            .document_path()
            .map(Location::in_file)
            .unwrap_or_default()
    })
}

fn attempt(attribute: &Attribute, document: &Query, path: &[StringMatch]) -> Result<Outcome, FsError> {
    let mut walked = match walk(document, path) {
        Ok(walked) => walked,
        Err(WalkError::NoMatch { location }) => return Ok(Outcome::Absent(location)),
        Err(WalkError::Fs(err)) if err.is_absent() => {
            return Ok(Outcome::Absent(absent_at(document, &err)));
        }
        Err(WalkError::Fs(err)) => return Err(err),
    };

    if attribute.key {
        let location = walked.cursor.location().clone();
        return Ok(match walked.last_match {
            Some(name) => Outcome::Found(Value::Str(name), location),
            None => Outcome::Absent(location),
        });
    }

    let cursor = &mut walked.cursor;
    let read = match attribute.ty {
        AttrType::Int => cursor.value::<i64>().map(Value::Int),
        AttrType::Bool => cursor.value::<bool>().map(Value::Bool),
        AttrType::Float => cursor.value::<f64>().map(Value::Float),
        AttrType::String => cursor.value::<String>().map(Value::Str),
        AttrType::StringList => cursor.value::<Vec<String>>().map(Value::List),
    };

    match read {
        Ok(value) => Ok(Outcome::Found(value, cursor.location().clone())),
        Err(err) if err.is_absent() => Ok(Outcome::Absent(
            err.location().cloned().unwrap_or_else(|| cursor.location().clone()),
        )),
        Err(err) => Err(err),
    }
}
