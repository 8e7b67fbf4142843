//! Taubyte Config Compiler Core Types
//!
//! Pure types shared by every layer of the compiler: the error model with
//! source locations, human-readable size/duration units and hashing.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hash;
pub mod location;
pub mod units;

// Re-exports
pub use error::{CoreError, CoreResult};
pub use hash::Hash;
pub use location::Location;
pub use units::{format_duration, format_size, parse_duration, parse_size};
