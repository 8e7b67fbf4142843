//! Taubyte Config Compiler Object Model
//!
//! A tree of named child objects carrying named attributes. The tree is
//! parametrized over the attribute type: [`Object<Value>`] is the
//! *reference* form the transform pipeline works on, [`Object<Vec<u8>>`]
//! the *opaque* form whose attributes are encoded blobs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod matching;
pub mod object;
pub mod selector;
pub mod value;

pub use error::{ObjectError, ObjectResult};
pub use matching::MatchMode;
pub use object::{ChildRef, Object};
pub use selector::Selector;
pub use value::Value;

/// The opaque parametrization
pub type Opaque = Object<Vec<u8>>;
