//! Taubyte Config Compiler
//!
//! Compiles a Taubyte project tree (a directory of YAML documents) into a
//! single object keyed by resource ids, plus lookup indexes and the checks
//! the compiler cannot do itself; and writes such an object back as a
//! project tree.
//!
//! ```no_run
//! use tcc_taubyte::{Compiler, CompilerOptions};
//!
//! let options = CompilerOptions::default()
//!     .with_branch("main")
//!     .with_source(std::path::PathBuf::from("./my-project"));
//! let compiled = Compiler::new(options).compile()?;
//! println!("{}", compiled.to_json());
//! # Ok::<(), tcc_core::CoreError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod compile;
pub mod compiler;
pub mod decompile;
pub mod kinds;
pub mod paths;
pub mod schema;
pub mod scope;

pub use compiler::{
    Compiled, Compiler, CompilerOptions, DEFAULT_BRANCH, Decompiler, DecompilerOptions, Source,
};
pub use kinds::Kind;
