//! Adapter capability traits
//!
//! Each resource type is exposed through the traits its locality and
//! mutability allow. Read-only types never see [`MutableResource`], and the
//! shape of `list` follows the locality.

use crate::context::Context;
use crate::error::Result;
use crate::meta::Key;
use crate::resource::ServiceInfo;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait Resource: Send + Sync {
    fn info(&self) -> &ServiceInfo;

    async fn get(&self, ctx: &Context, key: &Key) -> Result<Value>;

    /// Call a custom verb such as `SetTarget` or `GetHealth`.
    ///
    /// Verbs that return an operation resolve to `Value::Null` once the
    /// operation is done.
    async fn invoke(
        &self,
        ctx: &Context,
        key: &Key,
        method: &str,
        args: Option<Value>,
    ) -> Result<Value>;
}

#[async_trait]
pub trait GlobalResource: Resource {
    async fn list(&self, ctx: &Context) -> Result<Vec<Value>>;
}

#[async_trait]
pub trait RegionalResource: Resource {
    async fn list(&self, ctx: &Context, region: &str) -> Result<Vec<Value>>;
}

#[async_trait]
pub trait ZonalResource: Resource {
    async fn list(&self, ctx: &Context, zone: &str) -> Result<Vec<Value>>;
}

#[async_trait]
pub trait MutableResource: Resource {
    /// Create the object named by `key`
    async fn insert(&self, ctx: &Context, key: &Key, obj: Value) -> Result<()>;

    async fn delete(&self, ctx: &Context, key: &Key) -> Result<()>;
}

pub trait MutableGlobal: GlobalResource + MutableResource {}
impl<T: GlobalResource + MutableResource + ?Sized> MutableGlobal for T {}

pub trait MutableRegional: RegionalResource + MutableResource {}
impl<T: RegionalResource + MutableResource + ?Sized> MutableRegional for T {}

pub trait MutableZonal: ZonalResource + MutableResource {}
impl<T: ZonalResource + MutableResource + ?Sized> MutableZonal for T {}
