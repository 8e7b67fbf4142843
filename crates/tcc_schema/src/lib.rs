//! Taubyte Config Compiler Schema Engine
//!
//! A schema is a tree of [`Node`]s describing where things live in a source
//! tree. The [`Engine`] uses it in both directions: [`Engine::load`] walks a
//! filesystem into an object tree, [`Engine::dump`] writes an object tree
//! back as files.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attribute;
pub mod dumper;
pub mod engine;
pub mod loader;
pub mod matcher;
pub mod node;
pub mod walk;

pub use attribute::{AttrType, Attribute, Validator};
pub use engine::Engine;
pub use matcher::{StringMatch, either};
pub use node::Node;
pub use walk::{WalkError, Walked, walk};
