//! Forward passes: loaded project tree to compiled object and indexes.
//!
//! 1. [`normalize`] renames attributes, parses units and keys every
//!    resource and application by id, recording `name -> id` in the store.
//! 2. [`resolve`] turns domain and library names into ids.
//! 3. [`chroot`] moves the project under `object`.
//! 4. [`indexes`] builds the `indexes` sibling and the DNS validations,
//!    after which [`chroot::prune`] drops empty category groups.

pub mod chroot;
pub mod indexes;
pub mod normalize;
pub mod resolve;

use crate::kinds;
use tcc_transform::{Pipeline, global, sub};

pub use chroot::OBJECT;
pub use indexes::INDEXES;

/// The four passes for `branch`
#[must_use]
pub fn pipeline(branch: &str) -> Pipeline {
    let mut names = Pipeline::new("normalize").then(normalize::Project);
    let mut references = Pipeline::new("resolve");
    let mut links = Pipeline::new("indexes").then(indexes::prepare);

    for kind in kinds::ALL {
        names = names.then(global(sub(normalize::Normalize::new(kind), kind.category)));
        references = references.then(global(sub(resolve::Resolve::new(kind), kind.category)));
        links = links.then(sub(
            global(sub(indexes::Indexer::new(kind, branch), kind.category)),
            OBJECT,
        ));
    }

    Pipeline::new("compile")
        .then(names)
        .then(references)
        .then(chroot::chroot)
        .then(links)
        .then(chroot::prune)
}
