//! Pass 1': the project back at the root.

use crate::compile::OBJECT;
use tcc_core::{CoreError, CoreResult};
use tcc_object::{Object, Value};
use tcc_transform::Context;

/// The `object` child of a compiled root
///
/// # Errors
///
/// Returns a pipeline error if `root` was not produced by a compile
pub fn unwrap(_ctx: &Context, root: Object<Value>) -> CoreResult<Object<Value>> {
    root.child_object(OBJECT)
        .ok_or_else(|| CoreError::pipeline("unwrap", format!("compiled tree has no `{}`", OBJECT)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap() {
        let root = Object::new();
        let project = root.create_path(&[OBJECT]);
        root.create_path(&["indexes"]);
        let out = unwrap(&Context::new(), root).unwrap();
        assert!(out.ptr_eq(&project));
    }

    #[test]
    fn test_unwrap_missing() {
        let err = unwrap(&Context::new(), Object::new()).unwrap_err();
        assert_eq!(err.to_string(), "unwrap failed: compiled tree has no `object`");
    }
}
