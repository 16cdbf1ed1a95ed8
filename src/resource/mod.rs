//! Resource abstraction layer
//!
//! This module provides a data-driven approach to Compute Engine resources.
//! Resource types are described in a JSON table compiled into the binary,
//! so adding a type is a table edit plus a facade accessor.
//!
//! # Architecture
//!
//! - [`registry`] - Loads resource descriptions from embedded JSON
//! - [`fetcher`] - Fetches collections with pagination support
//! - [`url`] - Parses resource self-links into [`ResourceId`]s

pub mod fetcher;
pub mod registry;
pub mod url;

pub use fetcher::{fetch_all, fetch_page, Page};
pub use registry::{HttpMethod, MethodDef, Registry, Returns, ServiceInfo};
pub use url::{copy_via_json, parse_resource_url, ResourceId};
