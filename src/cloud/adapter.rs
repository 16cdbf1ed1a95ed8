//! Real adapter
//!
//! [`GceAdapter`] serves one resource type against the live API. Every call
//! follows the same order: rate limiter, project routing, dispatch on the
//! transport for the type's API version, then, for mutating calls, waiting
//! on the returned operation.

use super::api::{GlobalResource, MutableResource, RegionalResource, Resource, ZonalResource};
use super::op::Operation;
use super::ratelimit::RateLimitKey;
use super::service::Service;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::gcp::Transport;
use crate::meta::{Global, Key, Mutability, Mutable, Regional, Scope, Zonal};
use crate::resource::{fetch_all, HttpMethod, Returns, ServiceInfo};
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Adapter for one resource type. `M` is [`Mutable`] or
/// [`ReadOnly`](crate::meta::ReadOnly); only mutable adapters implement
/// [`MutableResource`].
pub struct GceAdapter<L, M = Mutable> {
    info: ServiceInfo,
    service: Arc<Service>,
    _scope: PhantomData<fn() -> (L, M)>,
}

impl<L: Scope, M: Mutability> GceAdapter<L, M> {
    pub fn new(info: ServiceInfo, service: Arc<Service>) -> Result<Self> {
        info.check_shape(L::LOCALITY, M::MUTABLE)?;
        Ok(Self {
            info,
            service,
            _scope: PhantomData,
        })
    }

    fn transport(&self) -> &dyn Transport {
        self.service.transport(self.info.version)
    }

    fn check_key(&self, key: &Key) -> Result<()> {
        let complete = !key.name().is_empty() && key.location().map_or(true, |l| !l.is_empty());
        if !complete || key.locality() != L::LOCALITY {
            return Err(Error::InvalidKey {
                service: self.info.name.clone(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    /// Rate limit the call and resolve the project it targets
    async fn prepare(&self, ctx: &Context, operation: &str) -> Result<String> {
        let rk = RateLimitKey::new(operation, self.info.version, self.info.object.as_str());
        self.service.rate_limiter.accept(ctx, &rk).await?;
        let project = self
            .service
            .project_router
            .project_id(ctx, self.info.version, &self.info.service);
        ctx.check()?;
        Ok(project)
    }

    async fn list_in(&self, ctx: &Context, location: Option<&str>) -> Result<Vec<Value>> {
        tracing::debug!("{}.List({:?})", self.info.name, location);
        let project = self.prepare(ctx, "List").await?;
        let path = self.info.collection_path(&project, location);
        let items = fetch_all(ctx, self.transport(), &path).await;
        if let Err(e) = &items {
            tracing::debug!("{}.List({:?}) = {}", self.info.name, location, e);
        }
        items
    }

    async fn wait(&self, ctx: &Context, response: Value) -> Result<()> {
        let op = Operation::from_value(self.info.version, response)?;
        self.service.wait_for_completion(ctx, op).await
    }
}

fn with_request_id(path: String) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{}{}requestId={}", path, sep, Uuid::new_v4())
}

#[async_trait]
impl<L: Scope, M: Mutability> Resource for GceAdapter<L, M> {
    fn info(&self) -> &ServiceInfo {
        &self.info
    }

    async fn get(&self, ctx: &Context, key: &Key) -> Result<Value> {
        tracing::debug!("{}.Get({})", self.info.name, key);
        self.check_key(key)?;
        let project = self.prepare(ctx, "Get").await?;
        let path = self.info.resource_path(&project, key)?;
        ctx.run(self.transport().get(&path)).await
    }

    async fn invoke(
        &self,
        ctx: &Context,
        key: &Key,
        method: &str,
        args: Option<Value>,
    ) -> Result<Value> {
        tracing::debug!("{}.{}({})", self.info.name, method, key);
        let def = self.info.method(method)?.clone();
        self.check_key(key)?;
        let project = self.prepare(ctx, &def.name).await?;

        let mut path = self.info.resource_path(&project, key)?;
        if let Some(suffix) = &def.suffix {
            path = format!("{}/{}", path, suffix);
        }
        if def.returns == Returns::Operation {
            path = with_request_id(path);
        }

        let transport = self.transport();
        let response = match def.http_method {
            HttpMethod::Get => ctx.run(transport.get(&path)).await?,
            HttpMethod::Post => ctx.run(transport.post(&path, args.as_ref())).await?,
            HttpMethod::Put => {
                let body = args.unwrap_or_else(|| Value::Object(Default::default()));
                ctx.run(transport.put(&path, &body)).await?
            }
        };

        match def.returns {
            Returns::Operation => {
                self.wait(ctx, response).await?;
                Ok(Value::Null)
            }
            Returns::Value => Ok(response),
        }
    }
}

#[async_trait]
impl<L: Scope> MutableResource for GceAdapter<L, Mutable> {
    async fn insert(&self, ctx: &Context, key: &Key, mut obj: Value) -> Result<()> {
        tracing::debug!("{}.Insert({})", self.info.name, key);
        self.check_key(key)?;
        let Some(fields) = obj.as_object_mut() else {
            return Err(Error::InvalidObject(format!(
                "{} must be a JSON object",
                self.info.object
            )));
        };
        fields.insert("name".to_string(), Value::String(key.name().to_string()));

        let project = self.prepare(ctx, "Insert").await?;
        let path = with_request_id(self.info.collection_path(&project, key.location()));
        let response = ctx.run(self.transport().post(&path, Some(&obj))).await?;
        self.wait(ctx, response).await
    }

    async fn delete(&self, ctx: &Context, key: &Key) -> Result<()> {
        tracing::debug!("{}.Delete({})", self.info.name, key);
        self.check_key(key)?;
        let project = self.prepare(ctx, "Delete").await?;
        let path = with_request_id(self.info.resource_path(&project, key)?);
        let response = ctx.run(self.transport().delete(&path)).await?;
        self.wait(ctx, response).await
    }
}

#[async_trait]
impl<M: Mutability> GlobalResource for GceAdapter<Global, M> {
    async fn list(&self, ctx: &Context) -> Result<Vec<Value>> {
        self.list_in(ctx, None).await
    }
}

#[async_trait]
impl<M: Mutability> RegionalResource for GceAdapter<Regional, M> {
    async fn list(&self, ctx: &Context, region: &str) -> Result<Vec<Value>> {
        self.list_in(ctx, Some(region)).await
    }
}

#[async_trait]
impl<M: Mutability> ZonalResource for GceAdapter<Zonal, M> {
    async fn list(&self, ctx: &Context, zone: &str) -> Result<Vec<Value>> {
        self.list_in(ctx, Some(zone)).await
    }
}
