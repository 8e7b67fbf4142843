//! Taubyte Config Compiler Filesystem
//!
//! A uniform read/write interface over a real or in-memory hierarchical
//! filesystem whose leaves are YAML documents, plus the [`Query`] cursor the
//! schema engine walks it with.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod document;
pub mod error;
pub mod memory;
pub mod os;
pub mod query;

pub use backend::{Entry, Filesystem, join_path};
pub use document::FromNode;
pub use error::{FsError, FsResult};
pub use memory::MemFs;
pub use os::OsFs;
pub use query::Query;
