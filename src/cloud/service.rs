//! Service bundle
//!
//! Everything a real adapter needs at dispatch time: one transport per API
//! version, the project router, the rate limiter, and the operation polling
//! interval.

use super::project::ProjectRouter;
use super::ratelimit::RateLimiter;
use crate::error::Result;
use crate::gcp::{ComputeClient, Transport};
use crate::meta::Version;
use std::sync::Arc;
use std::time::Duration;

/// Operations are never polled more often than this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct Service {
    pub ga: Arc<dyn Transport>,
    pub alpha: Arc<dyn Transport>,
    pub beta: Arc<dyn Transport>,
    pub project_router: Arc<dyn ProjectRouter>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    poll_interval: Duration,
}

impl Service {
    pub fn new(
        ga: Arc<dyn Transport>,
        alpha: Arc<dyn Transport>,
        beta: Arc<dyn Transport>,
        project_router: Arc<dyn ProjectRouter>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            ga,
            alpha,
            beta,
            project_router,
            rate_limiter,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Bundle of ADC-authenticated clients for all three versions
    pub async fn from_adc(
        project_router: Arc<dyn ProjectRouter>,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Result<Self> {
        let ga = ComputeClient::new(Version::Ga).await?;
        let alpha = ComputeClient::new(Version::Alpha).await?;
        let beta = ComputeClient::new(Version::Beta).await?;
        Ok(Self::new(
            Arc::new(ga),
            Arc::new(alpha),
            Arc::new(beta),
            project_router,
            rate_limiter,
        ))
    }

    /// Set the delay between operation polls (at least [`MIN_POLL_INTERVAL`])
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn transport(&self, version: Version) -> &dyn Transport {
        match version {
            Version::Ga => self.ga.as_ref(),
            Version::Alpha => self.alpha.as_ref(),
            Version::Beta => self.beta.as_ref(),
        }
    }
}
