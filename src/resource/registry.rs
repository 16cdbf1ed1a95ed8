//! Resource Registry - Load resource descriptions from JSON
//!
//! The declarative table of Compute Engine resource types lives in
//! `src/resources/compute.json` and is embedded into the binary. Each entry
//! names the object type, its REST collection, API version, locality,
//! whether it can be mutated, and any custom verbs.
//!
//! A [`Registry`] is an ordinary value: build it once and hand it to the
//! facade constructors.

use crate::error::{Error, Result};
use crate::meta::{Key, Locality, Version};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Embedded resource JSON (compiled into the binary)
const BUILTIN_TABLE: &str = include_str!("../resources/compute.json");

/// HTTP verb a custom method is issued with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

/// What a custom method hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Returns {
    /// A long-running operation that is waited on
    Operation,
    /// A plain value returned synchronously
    Value,
}

/// Custom (non-CRUD) verb
#[derive(Debug, Clone, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub http_method: HttpMethod,
    /// Path segment appended after the resource name; `None` addresses the
    /// resource itself (e.g. `Update` via PUT)
    #[serde(default)]
    pub suffix: Option<String>,
    pub returns: Returns,
}

/// Resource description from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceInfo {
    /// Service name, e.g. `AlphaAddresses`; filled in from the table key
    #[serde(skip)]
    pub name: String,
    /// API service the type belongs to, e.g. `Addresses` for `AlphaAddresses`.
    /// Defaults to the table key.
    #[serde(default)]
    pub service: String,
    /// Object type name, e.g. `Address`
    pub object: String,
    /// REST collection, e.g. `addresses`
    pub collection: String,
    #[serde(default)]
    pub version: Version,
    pub locality: Locality,
    #[serde(default)]
    pub read_only: bool,
    /// Collection sits directly under the project (regions, zones)
    #[serde(default)]
    pub project_level: bool,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
}

impl ServiceInfo {
    pub fn is_mutable(&self) -> bool {
        !self.read_only
    }

    /// Fail unless this type has the given locality and mutability
    pub fn check_shape(&self, locality: Locality, mutable: bool) -> Result<()> {
        if self.locality != locality {
            return Err(Error::Registry(format!(
                "{} is {} but was requested as {}",
                self.name, self.locality, locality
            )));
        }
        if self.is_mutable() != mutable {
            return Err(Error::Registry(format!(
                "{} is {} but was requested as {}",
                self.name,
                if self.is_mutable() { "mutable" } else { "read-only" },
                if mutable { "mutable" } else { "read-only" }
            )));
        }
        Ok(())
    }

    pub fn method(&self, name: &str) -> Result<&MethodDef> {
        self.methods
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| Error::UnknownMethod {
                service: self.name.clone(),
                method: name.to_string(),
            })
    }

    /// Path of the collection, relative to the version's base URL
    pub fn collection_path(&self, project: &str, location: Option<&str>) -> String {
        if self.project_level {
            return format!("projects/{}/{}", project, self.collection);
        }
        match (self.locality, location) {
            (Locality::Regional, Some(region)) => {
                format!("projects/{}/regions/{}/{}", project, region, self.collection)
            }
            (Locality::Zonal, Some(zone)) => {
                format!("projects/{}/zones/{}/{}", project, zone, self.collection)
            }
            _ => format!("projects/{}/global/{}", project, self.collection),
        }
    }

    /// Path of one resource; the key must match this type's locality
    pub fn resource_path(&self, project: &str, key: &Key) -> Result<String> {
        if key.locality() != self.locality {
            return Err(Error::InvalidKey {
                service: self.name.clone(),
                key: key.to_string(),
            });
        }
        Ok(format!(
            "{}/{}",
            self.collection_path(project, key.location()),
            key.name()
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    services: BTreeMap<String, ServiceInfo>,
}

/// The set of known resource types
#[derive(Debug, Clone)]
pub struct Registry {
    services: BTreeMap<String, ServiceInfo>,
}

impl Registry {
    /// Registry built from the embedded table
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLE)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(content)?;
        let services = file
            .services
            .into_iter()
            .map(|(name, mut info)| {
                info.name = name.clone();
                if info.service.is_empty() {
                    info.service = name.clone();
                }
                (name, info)
            })
            .collect();
        Ok(Self { services })
    }

    pub fn service(&self, name: &str) -> Result<&ServiceInfo> {
        self.services
            .get(name)
            .ok_or_else(|| Error::Registry(format!("unknown service {}", name)))
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceInfo> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Versions used by at least one service
    pub fn versions(&self) -> Vec<Version> {
        Version::ALL
            .into_iter()
            .filter(|v| self.services().any(|s| s.version == *v))
            .collect()
    }
}
