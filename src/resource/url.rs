//! Resource URL parsing
//!
//! Compute Engine names resources by self-link, e.g.
//! `https://www.googleapis.com/compute/v1/projects/p/zones/z/instances/vm`.
//! [`parse_resource_url`] turns such a link (or the bare `projects/...`
//! path) into a [`ResourceId`].

use crate::error::{Error, Result};
use crate::meta::{Key, Version};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A resource as identified by its URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub project_id: String,
    pub resource: String,
    /// Absent only for the `projects` resource itself
    pub key: Option<Key>,
}

impl ResourceId {
    pub fn new(project_id: impl Into<String>, resource: impl Into<String>, key: Option<Key>) -> Self {
        Self {
            project_id: project_id.into(),
            resource: resource.into(),
            key,
        }
    }
}

/// Strip one of the known version prefixes. Anything else is returned as-is.
fn strip_known_prefix(url: &str) -> &str {
    for version in Version::ALL {
        let prefix = version.url_prefix();
        if url.len() >= prefix.len() && url.starts_with(prefix) {
            return &url[prefix.len()..];
        }
    }
    url
}

/// Parse resource URLs of the following formats:
///
/// ```text
/// projects/<proj>
/// projects/<proj>/regions/<region>
/// projects/<proj>/zones/<zone>
/// projects/<proj>/global/<res>/<name>
/// projects/<proj>/regions/<region>/<res>/<name>
/// projects/<proj>/zones/<zone>/<res>/<name>
/// ```
///
/// each optionally preceded by `https://www.googleapis.com/compute/<ver>/`
/// where `<ver>` is one of `v1`, `alpha` or `beta`.
pub fn parse_resource_url(url: &str) -> Result<ResourceId> {
    let invalid = || Error::InvalidFormat(url.to_string());

    let parts: Vec<&str> = strip_known_prefix(url).split('/').collect();
    if parts.len() < 2 || parts[0] != "projects" {
        return Err(invalid());
    }
    let project = parts[1];

    match (parts.len(), parts.get(2).copied()) {
        (2, _) => Ok(ResourceId::new(project, "projects", None)),
        (4, Some(kind @ ("regions" | "zones"))) => {
            Ok(ResourceId::new(project, kind, Some(Key::global(parts[3]))))
        }
        (5, Some("global")) => Ok(ResourceId::new(
            project,
            parts[3],
            Some(Key::global(parts[4])),
        )),
        (6, Some("regions")) => Ok(ResourceId::new(
            project,
            parts[4],
            Some(Key::regional(parts[5], parts[3])),
        )),
        (6, Some("zones")) => Ok(ResourceId::new(
            project,
            parts[4],
            Some(Key::zonal(parts[5], parts[3])),
        )),
        _ => Err(invalid()),
    }
}

/// Convert between object shapes (e.g. a GA object into its alpha
/// counterpart) by round-tripping through JSON. Fields unknown to `D` are
/// dropped; fields missing from `S` take their defaults.
pub fn copy_via_json<S, D>(src: &S) -> Result<D>
where
    S: Serialize + ?Sized,
    D: DeserializeOwned,
{
    let value = serde_json::to_value(src)?;
    Ok(serde_json::from_value(value)?)
}
