//! In-process fakes for unit tests

use super::project::ProjectRouter;
use super::ratelimit::{RateLimitKey, RateLimiter};
use super::service::Service;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::gcp::Transport;
use crate::meta::Version;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type Route = (String, String);

/// Transport answering from canned responses
///
/// Responses queued for the same route are handed out in order; the last
/// one repeats. `requestId` query parameters are ignored when matching.
pub(crate) struct FakeTransport {
    version: Version,
    responses: Mutex<HashMap<Route, VecDeque<Result<Value>>>>,
    requests: Mutex<Vec<(String, String, Option<Value>)>>,
}

impl FakeTransport {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(&self, method: &str, path: &str, value: Value) {
        self.push(method, path, Ok(value));
    }

    pub fn fail(&self, method: &str, path: &str, err: Error) {
        self.push(method, path, Err(err));
    }

    /// Every request seen so far as (method, path, body)
    pub fn requests(&self) -> Vec<(String, String, Option<Value>)> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, method: &str, path: &str, response: Result<Value>) {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(response);
    }

    fn answer(&self, method: &str, path: &str, body: Option<&Value>) -> Result<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), path.to_string(), body.cloned()));

        let route = (method.to_string(), strip_request_id(path));
        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&route) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(Error::not_found(format!("no fake response for {method} {path}"))),
        }
    }
}

fn strip_request_id(path: &str) -> String {
    let Some((base, query)) = path.split_once('?') else {
        return path.to_string();
    };
    let rest: Vec<&str> = query
        .split('&')
        .filter(|p| !p.starts_with("requestId="))
        .collect();
    if rest.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, rest.join("&"))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    fn version(&self) -> Version {
        self.version
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.answer("GET", path, None)
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<Value> {
        self.answer("POST", path, body)
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.answer("PUT", path, Some(body))
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.answer("DELETE", path, None)
    }
}

/// Limiter that records every key and optionally refuses all calls
#[derive(Default)]
pub(crate) struct RecordingRateLimiter {
    keys: Mutex<Vec<RateLimitKey>>,
    refuse: bool,
}

impl RecordingRateLimiter {
    pub fn refusing() -> Self {
        Self {
            keys: Mutex::new(Vec::new()),
            refuse: true,
        }
    }

    pub fn keys(&self) -> Vec<RateLimitKey> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateLimiter for RecordingRateLimiter {
    async fn accept(&self, _ctx: &Context, key: &RateLimitKey) -> Result<()> {
        self.keys.lock().unwrap().push(key.clone());
        if self.refuse {
            return Err(Error::Throttled(key.to_string()));
        }
        Ok(())
    }
}

/// Router sending everything to project `p` and recording what it was asked
#[derive(Default)]
pub(crate) struct RecordingRouter {
    calls: Mutex<Vec<(Version, String)>>,
}

impl RecordingRouter {
    pub fn calls(&self) -> Vec<(Version, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProjectRouter for RecordingRouter {
    fn project_id(&self, _ctx: &Context, version: Version, service: &str) -> String {
        self.calls.lock().unwrap().push((version, service.to_string()));
        "p".to_string()
    }
}

/// A [`Service`] wired to fakes, routing everything to project `p`
pub(crate) struct Harness {
    pub ga: Arc<FakeTransport>,
    pub alpha: Arc<FakeTransport>,
    pub beta: Arc<FakeTransport>,
    pub limiter: Arc<RecordingRateLimiter>,
    pub router: Arc<RecordingRouter>,
    pub service: Arc<Service>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_limiter(RecordingRateLimiter::default())
    }

    pub fn with_limiter(limiter: RecordingRateLimiter) -> Self {
        let ga = Arc::new(FakeTransport::new(Version::Ga));
        let alpha = Arc::new(FakeTransport::new(Version::Alpha));
        let beta = Arc::new(FakeTransport::new(Version::Beta));
        let limiter = Arc::new(limiter);
        let router = Arc::new(RecordingRouter::default());
        let service = Service::new(
            ga.clone(),
            alpha.clone(),
            beta.clone(),
            router.clone(),
            limiter.clone(),
        );
        Self {
            ga,
            alpha,
            beta,
            limiter,
            router,
            service: Arc::new(service),
        }
    }
}

#[test]
fn test_strip_request_id() {
    assert_eq!(strip_request_id("a/b?requestId=1"), "a/b");
    assert_eq!(strip_request_id("a/b?x=1&requestId=1"), "a/b?x=1");
    assert_eq!(strip_request_id("a/b"), "a/b");
}
