//! Rate limiting
//!
//! Every adapter call passes through [`RateLimiter::accept`] before it is
//! dispatched. The limiter may block the caller, or refuse with
//! [`Error::Throttled`].

use crate::context::Context;
use crate::error::{Error, Result};
use crate::meta::Version;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use std::fmt;
use std::num::NonZeroU32;

/// Describes the call about to be made
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RateLimitKey {
    /// `Get`, `List`, `Insert`, `Delete` or a custom verb name
    pub operation: String,
    pub version: Version,
    /// Object type name, e.g. `Address`
    pub target: String,
}

impl RateLimitKey {
    pub fn new(operation: impl Into<String>, version: Version, target: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            version,
            target: target.into(),
        }
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.version, self.target, self.operation)
    }
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Block until the call may proceed, or fail
    async fn accept(&self, ctx: &Context, key: &RateLimitKey) -> Result<()>;
}

/// Lets every call through immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NopRateLimiter;

#[async_trait]
impl RateLimiter for NopRateLimiter {
    async fn accept(&self, _ctx: &Context, _key: &RateLimitKey) -> Result<()> {
        Ok(())
    }
}

/// Token bucket shared by all calls
pub struct QpsRateLimiter {
    limiter: DefaultDirectRateLimiter,
    block: bool,
}

impl QpsRateLimiter {
    /// `qps` permits per second with bursts of up to `burst` calls.
    /// When `block` is false an exhausted bucket fails the call instead of
    /// waiting.
    pub fn new(qps: NonZeroU32, burst: NonZeroU32, block: bool) -> Self {
        let quota = Quota::per_second(qps).allow_burst(burst);
        Self {
            limiter: governor::RateLimiter::direct(quota),
            block,
        }
    }
}

impl fmt::Debug for QpsRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QpsRateLimiter")
            .field("block", &self.block)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RateLimiter for QpsRateLimiter {
    async fn accept(&self, ctx: &Context, key: &RateLimitKey) -> Result<()> {
        if self.limiter.check().is_ok() {
            return Ok(());
        }
        if !self.block {
            tracing::debug!("Throttled {}", key);
            return Err(Error::Throttled(key.to_string()));
        }
        tracing::trace!("Waiting for rate limiter: {}", key);
        ctx.run(async {
            self.limiter.until_ready().await;
            Ok(())
        })
        .await
    }
}
