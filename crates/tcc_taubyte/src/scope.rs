//! Where a category group sits in the project.

use tcc_core::{CoreError, CoreResult};
use tcc_object::{Object, Value};
use tcc_transform::Context;
use tcc_transform::transformer::APPLICATIONS;

/// Project and application owning the category group at the top of a
/// context path
#[derive(Debug, Clone)]
pub struct Scope {
    /// Project object
    pub project: Object<Value>,
    /// Application key and object, when inside one
    pub app: Option<(String, Object<Value>)>,
}

impl Scope {
    /// Resolve from a context whose innermost frame is a category group
    ///
    /// # Errors
    ///
    /// Returns a pipeline error if the path is too short
    pub fn of(ctx: &Context, pass: &str) -> CoreResult<Self> {
        let path = ctx.path();
        let owner = match path.len() {
            0 | 1 => return Err(CoreError::pipeline(pass, "category outside a project")),
            n => &path[..n - 1],
        };
        let n = owner.len();
        if n >= 3 && owner[n - 2].name == APPLICATIONS {
            Ok(Self {
                project: owner[n - 3].object.clone(),
                app: Some((owner[n - 1].name.clone(), owner[n - 1].object.clone())),
            })
        } else {
            Ok(Self {
                project: owner[n - 1].object.clone(),
                app: None,
            })
        }
    }

    /// Project id
    ///
    /// # Errors
    ///
    /// Returns `NotExist` if the project has no id
    pub fn project_id(&self) -> CoreResult<String> {
        Ok(self.project.get_string("id")?)
    }

    /// Key of the application, if any
    #[must_use]
    pub fn app_key(&self) -> Option<&str> {
        self.app.as_ref().map(|(key, _)| key.as_str())
    }

    /// Application objects to search, innermost first
    #[must_use]
    pub fn owners(&self) -> Vec<Object<Value>> {
        let mut owners = Vec::with_capacity(2);
        if let Some((_, app)) = &self.app {
            owners.push(app.clone());
        }
        owners.push(self.project.clone());
        owners
    }
}
