//! Transformers and their combinators.

use crate::context::Context;
use tcc_core::CoreResult;
use tcc_object::{Object, Value};
use tracing::debug;

/// Name of the child holding per-application subtrees
pub const APPLICATIONS: &str = "applications";

/// One rewrite step over an object tree
pub trait Transformer: Send + Sync {
    /// Rewrite `object`, returning it or its replacement
    ///
    /// # Errors
    ///
    /// Returns the first error; callers stop the pipeline on it
    fn process(&self, ctx: &Context, object: Object<Value>) -> CoreResult<Object<Value>>;

    /// Label used in logs
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Transformer for F
where
    F: Fn(&Context, Object<Value>) -> CoreResult<Object<Value>> + Send + Sync,
{
    fn process(&self, ctx: &Context, object: Object<Value>) -> CoreResult<Object<Value>> {
        self(ctx, object)
    }
}

/// Apply `transformers` in order, stopping at the first error
///
/// # Errors
///
/// Returns the first transformer error, or `Cancelled`
pub fn pipe(
    ctx: &Context,
    object: Object<Value>,
    transformers: &[&dyn Transformer],
) -> CoreResult<Object<Value>> {
    let mut object = object;
    for transformer in transformers {
        ctx.check()?;
        object = transformer.process(ctx, object)?;
    }
    Ok(object)
}

/// Named, ordered list of transformers
#[derive(Default)]
pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    /// Create an empty pipeline
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Append a stage
    #[must_use]
    pub fn then(mut self, stage: impl Transformer + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of stages
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether there are no stages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Transformer for Pipeline {
    fn process(&self, ctx: &Context, object: Object<Value>) -> CoreResult<Object<Value>> {
        let mut object = object;
        for stage in &self.stages {
            ctx.check()?;
            debug!(pipeline = %self.name, stage = stage.name(), "running stage");
            object = stage.process(ctx, object)?;
        }
        Ok(object)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Runs the inner transformer on the project root, then on each application
pub struct Global<T> {
    inner: T,
}

/// Wrap `inner` in [`Global`]
#[must_use]
pub fn global<T: Transformer>(inner: T) -> Global<T> {
    Global { inner }
}

impl<T: Transformer> Transformer for Global<T> {
    fn process(&self, ctx: &Context, object: Object<Value>) -> CoreResult<Object<Value>> {
        let ctx = match ctx.last() {
            Some(frame) if frame.object.ptr_eq(&object) => ctx.clone(),
            _ => ctx.fork("", object.clone()),
        };

        let object = self.inner.process(&ctx, object)?;

        let Some(applications) = object.child_object(APPLICATIONS) else {
            return Ok(object);
        };
        let apps_ctx = ctx.fork(APPLICATIONS, applications.clone());
        for name in applications.children() {
            ctx.check()?;
            let Some(app) = applications.child_object(&name) else {
                continue;
            };
            let result = self
                .inner
                .process(&apps_ctx.fork(name.as_str(), app.clone()), app.clone())?;
            if !result.ptr_eq(&app) {
                applications.insert_child(name, result);
            }
        }
        Ok(object)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Runs the inner transformer on a named child, creating it if needed
pub struct Sub<T> {
    inner: T,
    child: String,
}

/// Wrap `inner` in [`Sub`] over `child`
#[must_use]
pub fn sub<T: Transformer>(inner: T, child: impl Into<String>) -> Sub<T> {
    Sub {
        inner,
        child: child.into(),
    }
}

impl<T: Transformer> Transformer for Sub<T> {
    fn process(&self, ctx: &Context, object: Object<Value>) -> CoreResult<Object<Value>> {
        let child = object.create_path(&[self.child.as_str()]);
        let result = self
            .inner
            .process(&ctx.fork(self.child.as_str(), child.clone()), child.clone())?;
        if !result.ptr_eq(&child) {
            object.insert_child(self.child.clone(), result);
        }
        Ok(object)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
