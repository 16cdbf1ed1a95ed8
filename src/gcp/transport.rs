//! Versioned transport
//!
//! The adapters never talk HTTP directly. They hand a path relative to the
//! version's base URL (e.g. `projects/p/global/firewalls/fw`) to a
//! [`Transport`], which returns the decoded JSON body.

use crate::error::Result;
use crate::meta::Version;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait Transport: Send + Sync {
    /// API version family this transport speaks
    fn version(&self) -> Version;

    async fn get(&self, path: &str) -> Result<Value>;

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value>;

    async fn put(&self, path: &str, body: &Value) -> Result<Value>;

    async fn delete(&self, path: &str) -> Result<Value>;
}
