//! Long-running operations
//!
//! Mutating calls return an [`Operation`]. [`Service::wait_for_completion`]
//! polls it on the transport that issued it until it is DONE.

use super::ratelimit::RateLimitKey;
use super::service::Service;
use crate::context::Context;
use crate::error::{Error, OperationErrorDetail, Result};
use crate::meta::{Key, Version};
use crate::resource::parse_resource_url;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    #[default]
    Pending,
    Running,
    Done,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationErrorPayload {
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

/// Handle on an in-flight backend task
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Version of the API that issued the operation
    #[serde(skip)]
    pub version: Version,
    pub name: String,
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub status: OperationStatus,
    #[serde(default)]
    pub error: Option<OperationErrorPayload>,
    #[serde(default)]
    pub http_error_status_code: Option<u16>,
    #[serde(default)]
    pub http_error_message: Option<String>,
}

impl Operation {
    pub fn from_value(version: Version, value: Value) -> Result<Self> {
        let mut op: Operation = serde_json::from_value(value)?;
        op.version = version;
        Ok(op)
    }

    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// Outcome of a DONE operation
    pub fn result(&self) -> Result<()> {
        match &self.error {
            Some(payload) => Err(Error::OperationFailed {
                name: self.name.clone(),
                code: self.http_error_status_code,
                details: payload.errors.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Path the operation is polled at, derived from its self-link
    pub fn poll_path(&self) -> Result<String> {
        let id = parse_resource_url(&self.self_link)?;
        let key = match id.key {
            Some(key) if id.resource == "operations" => key,
            _ => return Err(Error::InvalidFormat(self.self_link.clone())),
        };
        Ok(match &key {
            Key::Global { name } => {
                format!("projects/{}/global/operations/{}", id.project_id, name)
            }
            Key::Regional { name, region } => {
                format!("projects/{}/regions/{}/operations/{}", id.project_id, region, name)
            }
            Key::Zonal { name, zone } => {
                format!("projects/{}/zones/{}/operations/{}", id.project_id, zone, name)
            }
        })
    }
}

impl Service {
    /// Poll `op` until it is DONE. A poll that fails, a cancelled context,
    /// or a DONE operation carrying an error all end the wait with an error.
    pub async fn wait_for_completion(&self, ctx: &Context, mut op: Operation) -> Result<()> {
        let transport = self.transport(op.version);
        let mut polls = 0u32;

        while !op.is_done() {
            ctx.sleep(self.poll_interval()).await?;

            let rk = RateLimitKey::new("Get", op.version, "Operation");
            self.rate_limiter.accept(ctx, &rk).await?;

            let path = op.poll_path()?;
            let value = ctx.run(transport.get(&path)).await?;
            op = Operation::from_value(op.version, value)?;
            polls += 1;
            tracing::debug!("Operation {} is {:?} after {} poll(s)", op.name, op.status, polls);
        }

        tracing::info!("Operation {} done after {} poll(s)", op.name, polls);
        op.result()
    }
}
