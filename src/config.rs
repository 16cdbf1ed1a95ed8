//! Configuration Management
//!
//! Handles persistent configuration storage for gce-cloud.

use crate::cloud::{NopRateLimiter, QpsRateLimiter, RateLimiter};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn default_burst() -> u32 {
    1
}

fn default_block_on_throttle() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Project used when none is given on the command line
    #[serde(default)]
    pub project_id: Option<String>,
    /// Calls per second across all adapters; unset disables throttling
    #[serde(default)]
    pub qps: Option<u32>,
    #[serde(default = "default_burst")]
    pub burst: u32,
    /// Wait for a permit instead of failing when throttled
    #[serde(default = "default_block_on_throttle")]
    pub block_on_throttle: bool,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Upper bound on a whole runner invocation
    #[serde(default)]
    pub operation_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            qps: None,
            burst: default_burst(),
            block_on_throttle: default_block_on_throttle(),
            poll_interval_ms: default_poll_interval_ms(),
            operation_timeout_secs: None,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gce-cloud").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`; a missing or unreadable file yields the defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }

    pub fn set_project_at(&mut self, project_id: &str, path: &Path) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save_to(path)
    }

    /// Get effective project (CLI > config > gcloud default)
    pub fn effective_project(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.project_id.clone())
            .or_else(crate::gcp::auth::get_default_project)
    }

    /// Limiter described by `qps`, `burst` and `block_on_throttle`
    pub fn rate_limiter(&self) -> Arc<dyn RateLimiter> {
        match self.qps.and_then(NonZeroU32::new) {
            Some(qps) => {
                let burst = NonZeroU32::new(self.burst).unwrap_or(NonZeroU32::MIN);
                Arc::new(QpsRateLimiter::new(qps, burst, self.block_on_throttle))
            }
            None => Arc::new(NopRateLimiter),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_secs.map(Duration::from_secs)
    }
}
