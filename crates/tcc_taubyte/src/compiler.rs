//! Compiler and decompiler entry points.

use crate::compile::{self, INDEXES, OBJECT};
use crate::decompile;
use crate::schema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tcc_core::{CoreError, CoreResult};
use tcc_fs::{Filesystem, OsFs, Query};
use tcc_object::{Object, Value};
use tcc_transform::{Context, NextValidation, Transformer};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default branch compiled into naming-service paths
pub const DEFAULT_BRANCH: &str = "main";

/// Where a project tree is read from or written to
#[derive(Clone)]
pub enum Source {
    /// Directory on the local filesystem
    Directory(PathBuf),
    /// Any filesystem implementation
    Filesystem(Arc<dyn Filesystem>),
}

impl Source {
    fn filesystem(&self) -> Arc<dyn Filesystem> {
        match self {
            Self::Directory(path) => Arc::new(OsFs::new(path.clone())),
            Self::Filesystem(fs) => fs.clone(),
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Self::Directory(PathBuf::from("."))
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(path) => f.debug_tuple("Directory").field(path).finish(),
            Self::Filesystem(fs) => f.debug_tuple("Filesystem").field(fs).finish(),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Self::Directory(path)
    }
}

impl From<Arc<dyn Filesystem>> for Source {
    fn from(fs: Arc<dyn Filesystem>) -> Self {
        Self::Filesystem(fs)
    }
}

/// Compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Branch recorded in naming-service paths
    pub branch: String,
    /// Project tree to compile
    #[serde(skip)]
    pub source: Source,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            source: Source::default(),
        }
    }
}

impl CompilerOptions {
    /// Set the branch
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set the source
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Source>) -> Self {
        self.source = source.into();
        self
    }
}

/// Output of a compile
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Root with `object` and `indexes` children
    pub root: Object<Value>,
    /// Checks left for the caller, in emission order
    pub validations: Vec<NextValidation>,
}

impl Compiled {
    /// The compiled project
    ///
    /// # Errors
    ///
    /// Returns `NotExist` if the root has no `object` child
    pub fn payload(&self) -> CoreResult<Object<Value>> {
        Ok(self.root.fetch(&[OBJECT])?)
    }

    /// The lookup indexes
    ///
    /// # Errors
    ///
    /// Returns `NotExist` if the root has no `indexes` child
    pub fn indexes(&self) -> CoreResult<Object<Value>> {
        Ok(self.root.fetch(&[INDEXES])?)
    }

    /// `{object, indexes, validations}` as JSON
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let mut json = self.root.to_json();
        if let serde_json::Value::Object(map) = &mut json {
            let validations = serde_json::to_value(&self.validations).unwrap_or_default();
            map.insert("validations".to_string(), validations);
        }
        json
    }

    /// Inverse of [`Compiled::to_json`]
    ///
    /// # Errors
    ///
    /// Returns a decode error for malformed trees or validations
    pub fn from_json(json: &serde_json::Value) -> CoreResult<Self> {
        let mut json = json.clone();
        let validations = match json.as_object_mut().and_then(|map| map.remove("validations")) {
            Some(validations) => serde_json::from_value(validations)?,
            None => Vec::new(),
        };
        Ok(Self {
            root: Object::from_json(&json)?,
            validations,
        })
    }
}

/// Compiles a project tree
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    /// Create a compiler
    #[must_use]
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Options in use
    #[must_use]
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Load and compile the project
    ///
    /// # Errors
    ///
    /// Returns the first load or pass error
    pub fn compile(&self) -> CoreResult<Compiled> {
        self.compile_with(CancellationToken::new())
    }

    /// Like [`Compiler::compile`], stopping once `token` is cancelled
    ///
    /// # Errors
    ///
    /// Returns the first load or pass error, or `Cancelled`
    pub fn compile_with(&self, token: CancellationToken) -> CoreResult<Compiled> {
        info!(branch = %self.options.branch, source = ?self.options.source, "compiling project");
        let query = Query::new(self.options.source.filesystem()).with_cancellation(token.clone());
        let project = schema::engine().load(&query)?;
        debug!(id = ?project.get("id"), "project loaded");

        let ctx = Context::new().with_cancellation(token);
        let root = compile::pipeline(&self.options.branch).process(&ctx, project)?;
        let validations = ctx.store().validations().take();
        info!(validations = validations.len(), "project compiled");
        Ok(Compiled { root, validations })
    }
}

/// Decompiler configuration
#[derive(Debug, Clone, Default)]
pub struct DecompilerOptions {
    /// Where the project tree is written
    pub target: Source,
}

impl DecompilerOptions {
    /// Set the target
    #[must_use]
    pub fn with_target(mut self, target: impl Into<Source>) -> Self {
        self.target = target.into();
        self
    }
}

/// Writes a compiled object back as a project tree
#[derive(Debug, Clone, Default)]
pub struct Decompiler {
    options: DecompilerOptions,
}

impl Decompiler {
    /// Create a decompiler
    #[must_use]
    pub fn new(options: DecompilerOptions) -> Self {
        Self { options }
    }

    /// Decompile `root` (with its `object` child) into the target.
    ///
    /// `root` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the first pass or dump error
    pub fn decompile(&self, root: &Object<Value>) -> CoreResult<Object<Value>> {
        self.decompile_with(root, CancellationToken::new())
    }

    /// Like [`Decompiler::decompile`], stopping once `token` is cancelled
    ///
    /// # Errors
    ///
    /// Returns the first pass or dump error, or `Cancelled`
    pub fn decompile_with(&self, root: &Object<Value>, token: CancellationToken) -> CoreResult<Object<Value>> {
        info!(target = ?self.options.target, "decompiling project");
        let ctx = Context::new().with_cancellation(token.clone());
        let project = decompile::pipeline().process(&ctx, root.deep_clone())?;

        let query = Query::new(self.options.target.filesystem()).with_cancellation(token);
        schema::engine()
            .dump(&project, &query)
            .map_err(|err| match err {
                CoreError::Cancelled => err,
                err => CoreError::pipeline("dump", err.to_string()),
            })?;
        info!("project decompiled");
        Ok(project)
    }
}
