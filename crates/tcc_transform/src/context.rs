//! Transformer context.
//!
//! A context is read-only once built. [`Context::fork`] returns a new one
//! whose path is the parent's plus one frame; the cancellation token and the
//! [`Store`] are shared with the parent.

use crate::store::Store;
use tcc_core::{CoreError, CoreResult};
use tcc_object::{Object, Value};
use tokio_util::sync::CancellationToken;

/// One ancestor on the context path
#[derive(Debug, Clone)]
pub struct Frame {
    /// Key of the object in its parent; empty for the root
    pub name: String,
    /// The object itself
    pub object: Object<Value>,
}

/// Cancellation, ancestor path and shared store
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: CancellationToken,
    path: Vec<Frame>,
    store: Store,
}

impl Context {
    /// Fresh context with its own store and token
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `token` for cancellation
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Use an existing store
    #[must_use]
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = store;
        self
    }

    /// Child context with `object` appended to the path
    #[must_use]
    pub fn fork(&self, name: impl Into<String>, object: Object<Value>) -> Self {
        let mut path = self.path.clone();
        path.push(Frame {
            name: name.into(),
            object,
        });
        Self {
            cancel: self.cancel.clone(),
            path,
            store: self.store.clone(),
        }
    }

    /// Ancestor frames, outermost first
    #[must_use]
    pub fn path(&self) -> &[Frame] {
        &self.path
    }

    /// Innermost frame
    #[must_use]
    pub fn last(&self) -> Option<&Frame> {
        self.path.last()
    }

    /// Frame `depth` steps up from the innermost (0 is the innermost)
    #[must_use]
    pub fn ancestor(&self, depth: usize) -> Option<&Frame> {
        self.path.len().checked_sub(depth + 1).map(|i| &self.path[i])
    }

    /// Shared store
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Cancellation token
    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fail if cancelled
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` once the token is cancelled
    pub fn check(&self) -> CoreResult<()> {
        if self.cancel.is_cancelled() {
            Err(CoreError::Cancelled)
        } else {
            Ok(())
        }
    }
}
