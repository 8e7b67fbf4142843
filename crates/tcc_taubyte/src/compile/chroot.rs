//! Pass 3: move the project under `object`, and drop the empty category
//! groups the passes leave behind once indexing is done.

use crate::kinds;
use tcc_core::CoreResult;
use tcc_object::{Object, Value};
use tcc_transform::Context;
use tcc_transform::transformer::APPLICATIONS;

/// Child of the compiled root holding the project
pub const OBJECT: &str = "object";

/// New root whose only child is `project`
///
/// # Errors
///
/// Never fails; the signature matches the transformer closure shape
pub fn chroot(_ctx: &Context, project: Object<Value>) -> CoreResult<Object<Value>> {
    let root = Object::new();
    root.insert_child(OBJECT, project);
    Ok(root)
}

/// Remove category groups without children or attributes from the
/// project under `object` and from each of its applications
///
/// # Errors
///
/// Never fails
pub fn prune(_ctx: &Context, root: Object<Value>) -> CoreResult<Object<Value>> {
    if let Some(project) = root.child_object(OBJECT) {
        if let Some(applications) = project.child_object(APPLICATIONS) {
            for name in applications.children() {
                if let Some(app) = applications.child_object(&name) {
                    prune_groups(&app);
                }
            }
        }
        prune_groups(&project);
    }
    Ok(root)
}

fn prune_groups(owner: &Object<Value>) {
    let groups = kinds::ALL.iter().map(|kind| kind.category).chain([APPLICATIONS]);
    for name in groups {
        let empty = owner
            .child_object(name)
            .is_some_and(|group| group.children().is_empty() && group.attributes().is_empty());
        if empty {
            owner.remove_child(name);
        }
    }
}
