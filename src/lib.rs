//! Compute Engine API harness
//!
//! A uniform, key-addressed interface over Compute Engine resource types,
//! with a real implementation backed by the REST API and an in-memory mock
//! for tests.
//!
//! ```ignore
//! use gce_cloud::{Cloud, Context, Key, MockCloud, Registry};
//!
//! let registry = Registry::builtin()?;
//! let cloud = MockCloud::new(&registry)?;
//! cloud.firewalls().insert(&Context::background(), &Key::global("fw"), obj).await?;
//! ```

pub mod cloud;
pub mod config;
pub mod context;
pub mod error;
pub mod gcp;
pub mod meta;
pub mod resource;

pub use cloud::{
    Cloud, GceCloud, GlobalResource, MockCloud, MutableGlobal, MutableRegional, MutableResource,
    MutableZonal, RegionalResource, Resource, Service, ZonalResource,
};
pub use context::Context;
pub use error::{Error, Result};
pub use meta::{Key, Locality, Version};
pub use resource::{copy_via_json, parse_resource_url, Registry, ResourceId};
