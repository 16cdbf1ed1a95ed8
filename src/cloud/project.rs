//! Project routing
//!
//! Decides which project a call targets.

use crate::context::Context;
use crate::meta::Version;

pub trait ProjectRouter: Send + Sync {
    /// Project for calls to the API service `service` (e.g. `Addresses`, for
    /// every version) made through the `version` API
    fn project_id(&self, ctx: &Context, version: Version, service: &str) -> String;
}

/// Routes every call to the same project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleProjectRouter {
    pub id: String,
}

impl SingleProjectRouter {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl ProjectRouter for SingleProjectRouter {
    fn project_id(&self, _ctx: &Context, _version: Version, _service: &str) -> String {
        self.id.clone()
    }
}
