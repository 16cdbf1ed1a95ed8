//! Compute Engine Client
//!
//! One [`ComputeClient`] per API version family, combining authentication
//! and HTTP functionality behind the [`Transport`] trait.

use super::auth::{GcpCredentials, TokenSource};
use super::http::GcpHttpClient;
use super::transport::Transport;
use crate::error::{Error, Result};
use crate::meta::Version;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// REST client for one Compute Engine API version
#[derive(Clone)]
pub struct ComputeClient {
    http: GcpHttpClient,
    tokens: TokenSource,
    base_url: Url,
    version: Version,
}

impl ComputeClient {
    /// Create a client authenticated with Application Default Credentials
    pub async fn new(version: Version) -> Result<Self> {
        let credentials = GcpCredentials::new().await?;
        Self::with_token_source(version, TokenSource::Adc(credentials))
    }

    pub fn with_token_source(version: Version, tokens: TokenSource) -> Result<Self> {
        let base_url = Url::parse(version.url_prefix())
            .map_err(|_| Error::InvalidFormat(version.url_prefix().to_string()))?;

        Ok(Self {
            http: GcpHttpClient::new()?,
            tokens,
            base_url,
            version,
        })
    }

    /// Point the client at another endpoint (emulators, tests)
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        self.base_url =
            Url::parse(&normalized).map_err(|_| Error::InvalidFormat(base_url.to_string()))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Resolve a path relative to the version's base URL
    pub fn url(&self, path: &str) -> Result<String> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map(String::from)
            .map_err(|_| Error::InvalidFormat(path.to_string()))
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.url(path)?;
        let token = self.tokens.token().await?;
        self.http.send(method, &url, token.as_deref(), body).await
    }
}

#[async_trait]
impl Transport for ComputeClient {
    fn version(&self) -> Version {
        self.version
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.send(Method::POST, path, body).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, None).await
    }
}
