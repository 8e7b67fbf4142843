//! Taubyte Config Compiler Transform Framework
//!
//! Transformers rewrite an [`Object<Value>`](tcc_object::Object) tree one
//! step at a time. Each receives a [`Context`] carrying the cancellation
//! token, the stack of ancestor objects it was reached through and a
//! [`Store`] shared by every fork of the context.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod store;
pub mod transformer;
pub mod validation;

pub use context::{Context, Frame};
pub use store::{Entries, Store, Validations};
pub use transformer::{Global, Pipeline, Sub, Transformer, global, pipe, sub};
pub use validation::NextValidation;
