//! Inverse passes: compiled object back to a loadable project tree.

pub mod denormalize;
pub mod unresolve;
pub mod unwrap;

use crate::kinds;
use tcc_transform::{Pipeline, global, sub};

/// Passes 1' to 3'
#[must_use]
pub fn pipeline() -> Pipeline {
    let mut references = Pipeline::new("unresolve");
    let mut names = Pipeline::new("denormalize");
    for kind in kinds::ALL {
        references = references.then(global(sub(unresolve::Unresolve::new(kind), kind.category)));
        names = names.then(global(sub(denormalize::Denormalize::new(kind), kind.category)));
    }

    Pipeline::new("decompile")
        .then(unwrap::unwrap)
        .then(references)
        .then(names.then(denormalize::Project))
}
